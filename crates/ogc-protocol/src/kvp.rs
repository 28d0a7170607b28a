//! Key-value-pair query strings.

use std::collections::HashSet;

use url::Url;

use crate::error::{OgcError, OgcResult};

/// Set query parameters on a service endpoint.
///
/// Parameters already present on `base` with the same (case-sensitive) name
/// are replaced; other existing parameters, such as vendor keys baked into
/// the endpoint, are kept in front.
pub(crate) fn with_params(base: &str, params: &[(&str, String)]) -> OgcResult<String> {
    let mut url = Url::parse(base).map_err(|e| OgcError::InvalidEndpoint {
        url: base.to_string(),
        message: e.to_string(),
    })?;

    let replaced: HashSet<&str> = params.iter().map(|(k, _)| *k).collect();
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !replaced.contains(k.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut query = url.query_pairs_mut();
        query.clear();
        query.extend_pairs(kept);
        for (key, value) in params {
            query.append_pair(key, value);
        }
    }

    Ok(url.into())
}
