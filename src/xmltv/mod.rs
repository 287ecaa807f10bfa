//! XMLTV document rendering and merging for the channels this crate
//! manages. Grounded on spec.md §6's XMLTV output requirement; uses
//! `quick-xml`'s serde integration (the teacher's declared but idle
//! dependency for this format) rather than hand-rolled string building.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::{TeamarrError, TeamarrResult};
use crate::models::channel::ManagedChannel;
use crate::models::event::Event;

#[derive(Debug, Clone, Serialize)]
#[serde(rename = "tv")]
pub struct XmltvDocument {
    #[serde(rename = "@generator-info-name")]
    pub generator: String,
    #[serde(rename = "channel", default)]
    pub channels: Vec<XmltvChannel>,
    #[serde(rename = "programme", default)]
    pub programmes: Vec<XmltvProgramme>,
}

#[derive(Debug, Clone, Serialize)]
pub struct XmltvChannel {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "display-name")]
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct XmltvProgramme {
    #[serde(rename = "@start")]
    pub start: String,
    #[serde(rename = "@stop")]
    pub stop: String,
    #[serde(rename = "@channel")]
    pub channel: String,
    pub title: String,
    #[serde(rename = "sub-title", skip_serializing_if = "Option::is_none")]
    pub sub_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// XMLTV's required `YYYYMMDDHHMMSS +0000` timestamp format.
fn xmltv_time(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%d%H%M%S +0000").to_string()
}

/// Builds one channel's `<programme>` entry from its matched event. The
/// programme spans from the event's start time to an estimated end time,
/// since providers rarely supply a hard stop for in-progress games.
pub fn programme_for_channel(channel: &ManagedChannel, event: &Event, estimated_duration_minutes: u32) -> XmltvProgramme {
    let stop = event.start_time + chrono::Duration::minutes(estimated_duration_minutes as i64);
    XmltvProgramme {
        start: xmltv_time(event.start_time),
        stop: xmltv_time(stop),
        channel: channel.tvg_id.clone(),
        title: channel.channel_name.clone(),
        sub_title: event.venue.as_ref().map(|v| v.name.clone()),
        desc: Some(event.name.clone()),
        category: Some(event.league.clone()),
    }
}

pub fn channel_entry(channel: &ManagedChannel) -> XmltvChannel {
    XmltvChannel {
        id: channel.tvg_id.clone(),
        display_name: channel.channel_name.clone(),
    }
}

/// Renders a full XMLTV document as a UTF-8 XML string.
pub fn render(document: &XmltvDocument) -> TeamarrResult<String> {
    let body = quick_xml::se::to_string(document).map_err(|e| TeamarrError::internal(e.to_string()))?;
    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{body}\n"))
}

/// Merges per-group XMLTV documents into one, deduplicating channels by id
/// (the same channel should never appear twice, but a bug upstream
/// shouldn't produce invalid XMLTV).
pub fn merge(documents: Vec<XmltvDocument>, generator: impl Into<String>) -> XmltvDocument {
    let mut seen_channels = std::collections::HashSet::new();
    let mut channels = Vec::new();
    let mut programmes = Vec::new();

    for doc in documents {
        for channel in doc.channels {
            if seen_channels.insert(channel.id.clone()) {
                channels.push(channel);
            }
        }
        programmes.extend(doc.programmes);
    }

    XmltvDocument {
        generator: generator.into(),
        channels,
        programmes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_dedups_channels_by_id() {
        let doc_a = XmltvDocument {
            generator: "teamarr".to_string(),
            channels: vec![XmltvChannel {
                id: "teamarr-event-espn-1".to_string(),
                display_name: "Lions @ Bucs".to_string(),
            }],
            programmes: vec![],
        };
        let doc_b = XmltvDocument {
            generator: "teamarr".to_string(),
            channels: vec![XmltvChannel {
                id: "teamarr-event-espn-1".to_string(),
                display_name: "Lions @ Bucs".to_string(),
            }],
            programmes: vec![],
        };
        let merged = merge(vec![doc_a, doc_b], "teamarr");
        assert_eq!(merged.channels.len(), 1);
    }

    #[test]
    fn renders_well_formed_xml_header() {
        let doc = XmltvDocument {
            generator: "teamarr".to_string(),
            channels: vec![],
            programmes: vec![],
        };
        let xml = render(&doc).unwrap();
        assert!(xml.starts_with("<?xml"));
    }
}
