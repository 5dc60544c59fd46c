//! Request bodies and the `207 Multi-Status` href parser.
//!
//! Only `href` elements in the `DAV:` namespace are consumed; every other
//! element is walked past. Namespace resolution is done by quick-xml's
//! [`NsReader`], so documents using any prefix (or a default namespace) for
//! `DAV:` are handled alike.

use percent_encoding::percent_decode_str;
use quick_xml::NsReader;
use quick_xml::events::{BytesRef, Event};
use quick_xml::name::{Namespace, ResolveResult};

use crate::common::error::{DavError, Result};

/// `DAV:` namespace name.
pub const DAV_NAMESPACE: &[u8] = b"DAV:";

/// Body of the listing `PROPFIND`: only `resourcetype` is requested.
pub const PROPFIND_RESOURCETYPE_BODY: &str =
    r#"<propfind xmlns="DAV:"><prop><resourcetype/></prop></propfind>"#;

fn is_dav(ns: &ResolveResult<'_>) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(name)) if *name == DAV_NAMESPACE)
}

struct HrefCollector<F> {
    depth: usize,
    saw_root: bool,
    in_href: bool,
    text: String,
    on_href: F,
}

impl<F> HrefCollector<F>
where
    F: FnMut(String) -> Result<()>,
{
    fn new(on_href: F) -> Self {
        Self {
            depth: 0,
            saw_root: false,
            in_href: false,
            text: String::new(),
            on_href,
        }
    }

    fn on_start(&mut self, dav: bool, local: &[u8]) {
        self.depth += 1;
        self.saw_root = true;
        if dav && local == b"href" {
            self.in_href = true;
            self.text.clear();
        }
    }

    fn on_end(&mut self, dav: bool, local: &[u8]) -> Result<()> {
        self.depth = self.depth.saturating_sub(1);
        if self.in_href && dav && local == b"href" {
            self.in_href = false;
            let raw = std::mem::take(&mut self.text);
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                let decoded = percent_decode_str(trimmed).decode_utf8_lossy().into_owned();
                (self.on_href)(decoded)?;
            }
        }
        Ok(())
    }

    fn on_text(&mut self, text: &str) {
        if self.in_href {
            self.text.push_str(text);
        }
    }

    fn finish(self) -> Result<()> {
        if !self.saw_root {
            return Err(DavError::Parse("document has no root element".into()));
        }
        if self.depth != 0 {
            return Err(DavError::Parse("document ended inside an element".into()));
        }
        Ok(())
    }
}

fn resolve_reference(reference: &BytesRef<'_>) -> Result<String> {
    let name = String::from_utf8_lossy(reference);
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => num.parse(),
        }
        .map_err(|_| DavError::Parse(format!("bad character reference &{name};")))?;
        return char::from_u32(code)
            .map(String::from)
            .ok_or_else(|| DavError::Parse(format!("invalid character reference &{name};")));
    }

    let resolved = match name.as_ref() {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        _ => return Err(DavError::Parse(format!("unknown entity &{name};"))),
    };
    Ok(resolved.to_string())
}

/// Parse a multistatus body and invoke `on_href` for each percent-decoded `DAV:href`,
/// in document order.
///
/// A body that is empty (or only whitespace) produces no callbacks and is not parsed.
pub fn parse_multistatus_hrefs_visit<F>(body: &[u8], on_href: F) -> Result<()>
where
    F: FnMut(String) -> Result<()>,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }

    let mut xml = NsReader::from_reader(body);
    xml.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(8 * 1024);
    let mut collector = HrefCollector::new(on_href);

    loop {
        let (ns, event) = xml
            .read_resolved_event_into(&mut buf)
            .map_err(|e| DavError::Parse(format!("XML error: {e}")))?;
        let dav = is_dav(&ns);
        match event {
            Event::Start(e) => collector.on_start(dav, e.local_name().as_ref()),
            Event::Empty(e) => {
                collector.on_start(dav, e.local_name().as_ref());
                collector.on_end(dav, e.local_name().as_ref())?;
            }
            Event::End(e) => collector.on_end(dav, e.local_name().as_ref())?,
            Event::Text(e) => collector.on_text(&String::from_utf8_lossy(e.as_ref())),
            Event::CData(e) => collector.on_text(&String::from_utf8_lossy(e.as_ref())),
            Event::GeneralRef(e) => {
                if collector.in_href {
                    collector.on_text(&resolve_reference(&e)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    collector.finish()
}

/// Collect every percent-decoded `DAV:href` of a multistatus body.
pub fn parse_multistatus_hrefs(body: &[u8]) -> Result<Vec<String>> {
    let mut hrefs = Vec::new();
    parse_multistatus_hrefs_visit(body, |href| {
        hrefs.push(href);
        Ok(())
    })?;
    Ok(hrefs)
}

/// Rewrites listing hrefs relative to the base path and drops the listing's own entry.
#[derive(Debug, Clone)]
pub struct ListingScope {
    origin: String,
    base_path: String,
    requested: String,
}

impl ListingScope {
    /// `requested` is the directory path the listing was issued for, as the caller passed it.
    pub fn new(origin: &str, base_path: &str, requested: &str) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            base_path: base_path.to_string(),
            requested: requested.trim_matches('/').to_string(),
        }
    }

    /// Relative form of a decoded href, or `None` for the directory itself and for a bare
    /// server origin.
    pub fn relativize(&self, href: &str) -> Option<String> {
        if self.is_bare_origin(href) {
            return None;
        }

        let path = match href.split_once("://") {
            Some((_, rest)) => rest.find('/').map_or("", |idx| &rest[idx..]),
            None => href,
        };

        let relative = match path.strip_prefix(self.base_path.as_str()) {
            Some(rest) => rest,
            None => match path.rsplit_once(self.base_path.as_str()) {
                Some((_, tail)) => tail,
                None => path.trim_start_matches('/'),
            },
        };

        if relative.trim_matches('/') == self.requested {
            return None;
        }
        Some(relative.to_string())
    }

    fn is_bare_origin(&self, href: &str) -> bool {
        let href = href.trim_end_matches('/');
        href.eq_ignore_ascii_case(&self.origin)
            || self
                .origin
                .split_once("://")
                .is_some_and(|(_, host)| href.eq_ignore_ascii_case(host))
    }
}

/// Parse a listing body, optionally rewriting entries through `scope`.
pub fn parse_listing(body: &[u8], scope: Option<&ListingScope>) -> Result<Vec<String>> {
    let mut entries = Vec::new();
    parse_multistatus_hrefs_visit(body, |href| {
        match scope {
            Some(scope) => entries.extend(scope.relativize(&href)),
            None => entries.push(href),
        }
        Ok(())
    })?;
    Ok(entries)
}
