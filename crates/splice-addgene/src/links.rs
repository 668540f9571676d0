use reqwest::Url;

use crate::{AddgeneError, ADDGENE_ORIGIN};

fn parse(raw: &str) -> Result<Url, AddgeneError> {
    Url::parse(raw).map_err(|e| AddgeneError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Drop the query and fragment of an Addgene URL and force a trailing slash.
pub fn normalize_url(raw: &str) -> Result<String, AddgeneError> {
    if !raw.starts_with(ADDGENE_ORIGIN) {
        return Err(AddgeneError::ForeignUrl(raw.to_string()));
    }
    let mut url = parse(raw)?;
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url.to_string())
}

/// Directory name for a kit: `/kits/moclo-ytk/` becomes `moclo-ytk`, and
/// nested paths are joined with `_`.
pub fn kit_dirname(url: &str) -> Result<String, AddgeneError> {
    let url = parse(url)?;
    let path = url.path();
    let path = path.strip_prefix("/kits/").unwrap_or(path);
    Ok(path.trim_matches('/').replace('/', "_"))
}

/// Last non-empty `/`-separated segment of a link.
pub fn last_path_segment(href: &str) -> Option<&str> {
    href.split('/').rev().find(|segment| !segment.is_empty())
}
