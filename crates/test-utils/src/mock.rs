//! Scripted HTTP fetcher standing in for WMS/WFS servers.
//!
//! Routes match on query parameters of the requested URL. Each route replays
//! its replies in order and keeps repeating the last one. Unmatched requests
//! get an empty 404.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ogc_protocol::{HttpFetcher, HttpResponse, OgcError, OgcResult};
use url::Url;

/// One canned answer.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Complete exchange with this status and body.
    Respond {
        status: u16,
        body: String,
        delay: Option<Duration>,
    },
    /// Connection-level failure.
    Fail(String),
}

impl MockReply {
    pub fn ok(body: impl Into<String>) -> Self {
        MockReply::Respond {
            status: 200,
            body: body.into(),
            delay: None,
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        MockReply::Respond {
            status,
            body: body.into(),
            delay: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        MockReply::Fail(message.into())
    }

    /// Hold the reply back for `delay` before answering.
    pub fn delayed(self, delay: Duration) -> Self {
        match self {
            MockReply::Respond { status, body, .. } => MockReply::Respond {
                status,
                body,
                delay: Some(delay),
            },
            fail => fail,
        }
    }
}

struct Route {
    params: Vec<(String, String)>,
    replies: VecDeque<MockReply>,
}

impl Route {
    fn matches(&self, query: &HashMap<String, String>) -> bool {
        self.params
            .iter()
            .all(|(k, v)| query.get(k).map(|q| q == v).unwrap_or(false))
    }

    fn next_reply(&mut self) -> Option<MockReply> {
        if self.replies.len() > 1 {
            self.replies.pop_front()
        } else {
            self.replies.front().cloned()
        }
    }
}

/// Records every request and answers from scripted routes.
#[derive(Default)]
pub struct MockFetcher {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests whose query contains all of `params`.
    pub fn on(self, params: &[(&str, &str)], replies: Vec<MockReply>) -> Self {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(Route {
                params: params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                replies: replies.into(),
            });
        }
        self
    }

    /// GetFeatureInfo for one WMS layer.
    pub fn on_wms(self, layer_name: &str, reply: MockReply) -> Self {
        self.on(
            &[("REQUEST", "GetFeatureInfo"), ("QUERY_LAYERS", layer_name)],
            vec![reply],
        )
    }

    /// GetFeature for one WFS type, any output format; replies in order.
    pub fn on_wfs(self, type_name: &str, replies: Vec<MockReply>) -> Self {
        self.on(
            &[("request", "GetFeature"), ("typenames", type_name)],
            replies,
        )
    }

    /// Every URL requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Decoded query parameters of every request so far.
    pub fn request_params(&self) -> Vec<HashMap<String, String>> {
        self.requests().iter().map(|u| query_map(u)).collect()
    }

    pub fn wms_request_count(&self) -> usize {
        self.count_where("REQUEST", "GetFeatureInfo")
    }

    pub fn wfs_request_count(&self) -> usize {
        self.count_where("request", "GetFeature")
    }

    fn count_where(&self, key: &str, value: &str) -> usize {
        self.request_params()
            .iter()
            .filter(|p| p.get(key).map(|v| v == value).unwrap_or(false))
            .count()
    }
}

/// Decode the query string of a URL into a map.
pub fn query_map(url: &str) -> HashMap<String, String> {
    Url::parse(url)
        .map(|u| {
            u.query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl HttpFetcher for MockFetcher {
    async fn get(&self, url: &str, _accept: &str) -> OgcResult<HttpResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }

        let query = query_map(url);
        let reply = self.routes.lock().ok().and_then(|mut routes| {
            routes
                .iter_mut()
                .find(|r| r.matches(&query))
                .and_then(Route::next_reply)
        });

        match reply {
            Some(MockReply::Respond {
                status,
                body,
                delay,
            }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(HttpResponse::new(status, body))
            }
            Some(MockReply::Fail(message)) => Err(OgcError::Transport {
                url: url.to_string(),
                message,
            }),
            None => Ok(HttpResponse::new(404, "")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_match_and_repeat_last() {
        let mock = MockFetcher::new().on_wfs(
            "topp:states",
            vec![MockReply::ok("first"), MockReply::ok("second")],
        );
        let url = "https://ogc.test/wfs?request=GetFeature&typenames=topp%3Astates";

        let bodies: Vec<String> = (0..3)
            .map(|_| tokio_test::block_on(mock.get(url, "application/json")).unwrap().body)
            .collect();
        assert_eq!(bodies, vec!["first", "second", "second"]);
        assert_eq!(mock.wfs_request_count(), 3);
    }

    #[test]
    fn test_unmatched_is_404() {
        let mock = MockFetcher::new().on_wms("topp:states", MockReply::ok("{}"));
        let resp = tokio_test::block_on(
            mock.get("https://ogc.test/wms?REQUEST=GetMap", "application/json"),
        )
        .unwrap();
        assert_eq!(resp.status, 404);
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn test_fail_reply_is_transport_error() {
        let mock = MockFetcher::new().on_wms("a", MockReply::fail("connection reset"));
        let result = tokio_test::block_on(mock.get(
            "https://ogc.test/wms?REQUEST=GetFeatureInfo&QUERY_LAYERS=a",
            "application/json",
        ));
        assert!(matches!(result, Err(OgcError::Transport { .. })));
    }
}
