//! GraphML edge reader.
//!
//! Parses the `<graph>` element of a GraphML document: `<key>` declarations
//! with `for="edge"` map attribute ids to names, `<node>` elements establish
//! vertex ids (the gene symbol itself, per the graph's vertex-id
//! convention), and `<edge>` elements carry `source`/`target` endpoints plus
//! optional nested `<data>` values for the `sources` and `interaction_type`
//! attributes described in the input contract.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::{GraphProviderError, RawEdge};

const SOURCES_ATTR: &str = "sources";
const INTERACTION_TYPE_ATTR: &str = "interaction_type";

struct PendingEdge {
    gene_a: String,
    gene_b: String,
    sources: Option<String>,
    interaction_type: Option<String>,
}

impl PendingEdge {
    fn into_raw_edge(self) -> RawEdge {
        let source_tag = match (self.sources, self.interaction_type) {
            (Some(sources), Some(interaction_type)) => {
                format!("{sources}|type:{interaction_type}")
            }
            (Some(sources), None) => sources,
            (None, Some(interaction_type)) => format!("type:{interaction_type}"),
            (None, None) => String::new(),
        };
        RawEdge {
            gene_a: self.gene_a,
            gene_b: self.gene_b,
            source_tag,
        }
    }
}

/// Reads a GraphML document's edges into a flat list of [`RawEdge`] values.
///
/// # Errors
///
/// Returns [`GraphProviderError::Io`] if the file cannot be opened,
/// [`GraphProviderError::Xml`] if the document is not well-formed XML, and
/// [`GraphProviderError::MissingEdgeEndpoint`] if an `<edge>` element lacks
/// a `source` or `target` attribute.
pub fn read_graphml(path: &Path) -> Result<Vec<RawEdge>, GraphProviderError> {
    let file = std::fs::File::open(path).map_err(|source| GraphProviderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_graphml_from(path, std::io::BufReader::new(file))
}

fn read_graphml_from<R: BufRead>(
    path: &Path,
    inner: R,
) -> Result<Vec<RawEdge>, GraphProviderError> {
    let mut reader = Reader::from_reader(inner);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut key_names: HashMap<String, String> = HashMap::new();
    let mut edges = Vec::new();
    let mut current: Option<PendingEdge> = None;
    let mut current_data_key: Option<String> = None;

    loop {
        let position = reader.buffer_position();
        let xml_err = |err: quick_xml::Error| GraphProviderError::Xml {
            path: path.display().to_string(),
            position: usize::try_from(position).unwrap_or(usize::MAX),
            reason: err.to_string(),
        };
        let event = reader.read_event_into(&mut buf).map_err(xml_err)?;

        match &event {
            Event::Start(tag) => {
                handle_open_tag(tag, path, position, &mut key_names, &mut current)?;
                if local_name(tag) == "data" {
                    current_data_key = read_attrs(tag, path, position)?.remove("key");
                }
            }
            Event::Empty(tag) => {
                handle_open_tag(tag, path, position, &mut key_names, &mut current)?;
                if local_name(tag) == "edge" {
                    if let Some(pending) = current.take() {
                        edges.push(pending.into_raw_edge());
                    }
                }
            }
            Event::Text(text) => {
                if let (Some(key), Some(pending)) = (&current_data_key, current.as_mut()) {
                    let value = text.unescape().map_err(xml_err)?.into_owned();
                    assign_data(pending, &key_names, key, value);
                }
            }
            Event::End(tag) => match local_name_bytes(tag.name().as_ref()) {
                "data" => current_data_key = None,
                "edge" => {
                    if let Some(pending) = current.take() {
                        edges.push(pending.into_raw_edge());
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(edges)
}

fn handle_open_tag(
    tag: &BytesStart<'_>,
    path: &Path,
    position: u64,
    key_names: &mut HashMap<String, String>,
    current: &mut Option<PendingEdge>,
) -> Result<(), GraphProviderError> {
    match local_name(tag) {
        "key" => {
            let attrs = read_attrs(tag, path, position)?;
            if attrs.get("for").map(String::as_str) == Some("edge") {
                if let (Some(id), Some(attr_name)) = (attrs.get("id"), attrs.get("attr.name")) {
                    key_names.insert(id.clone(), attr_name.clone());
                }
            }
        }
        "edge" => {
            let attrs = read_attrs(tag, path, position)?;
            let gene_a = attrs.get("source").cloned().ok_or_else(|| {
                GraphProviderError::MissingEdgeEndpoint {
                    path: path.display().to_string(),
                    position: usize::try_from(position).unwrap_or(usize::MAX),
                    attribute: "source",
                }
            })?;
            let gene_b = attrs.get("target").cloned().ok_or_else(|| {
                GraphProviderError::MissingEdgeEndpoint {
                    path: path.display().to_string(),
                    position: usize::try_from(position).unwrap_or(usize::MAX),
                    attribute: "target",
                }
            })?;
            *current = Some(PendingEdge {
                gene_a,
                gene_b,
                sources: None,
                interaction_type: None,
            });
        }
        _ => {}
    }
    Ok(())
}

fn assign_data(pending: &mut PendingEdge, key_names: &HashMap<String, String>, key: &str, value: String) {
    match key_names.get(key).map(String::as_str) {
        Some(SOURCES_ATTR) => pending.sources = Some(value),
        Some(INTERACTION_TYPE_ATTR) => pending.interaction_type = Some(value),
        _ => {}
    }
}

fn local_name<'a>(tag: &'a BytesStart<'a>) -> &'a str {
    local_name_bytes(tag.name().into_inner())
}

fn local_name_bytes(full: &[u8]) -> &str {
    let name = std::str::from_utf8(full).unwrap_or("");
    name.rsplit(':').next().unwrap_or(name)
}

fn read_attrs(
    tag: &BytesStart<'_>,
    path: &Path,
    position: u64,
) -> Result<HashMap<String, String>, GraphProviderError> {
    let mut attrs = HashMap::new();
    for attr in tag.attributes() {
        let attr = attr.map_err(|err| GraphProviderError::Xml {
            path: path.display().to_string(),
            position: usize::try_from(position).unwrap_or(usize::MAX),
            reason: err.to_string(),
        })?;
        let key = local_name_bytes(attr.key.as_ref()).to_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| GraphProviderError::Xml {
                path: path.display().to_string(),
                position: usize::try_from(position).unwrap_or(usize::MAX),
                reason: err.to_string(),
            })?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns">
  <key id="d0" for="edge" attr.name="sources" attr.type="string"/>
  <key id="d1" for="edge" attr.name="interaction_type" attr.type="string"/>
  <graph edgedefault="undirected">
    <node id="TP53"/>
    <node id="EGFR"/>
    <node id="MYC"/>
    <edge source="TP53" target="EGFR">
      <data key="d0">BioGRID,STRING</data>
      <data key="d1">physical</data>
    </edge>
    <edge source="EGFR" target="MYC"/>
  </graph>
</graphml>
"#;

    #[test]
    fn reads_edges_with_and_without_data() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "{SAMPLE}").expect("write sample");
        let edges = read_graphml(file.path()).expect("parse graphml");
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].gene_a, "TP53");
        assert_eq!(edges[0].gene_b, "EGFR");
        assert_eq!(edges[0].source_tag, "BioGRID,STRING|type:physical");
        assert_eq!(edges[1].gene_a, "EGFR");
        assert_eq!(edges[1].gene_b, "MYC");
        assert_eq!(edges[1].source_tag, "");
    }

    #[test]
    fn missing_endpoint_is_reported() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"<graphml><graph><edge target="EGFR"/></graph></graphml>"#
        )
        .expect("write sample");
        let err = read_graphml(file.path()).expect_err("missing source must fail");
        assert!(matches!(
            err,
            GraphProviderError::MissingEdgeEndpoint { attribute: "source", .. }
        ));
    }
}
