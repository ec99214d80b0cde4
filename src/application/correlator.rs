//! Detail correlator
//!
//! Each listing card is sent to the hover endpoint with its own snapshot in a
//! [`CorrelationToken`]. Response handlers merge the hover payload into that
//! snapshot and hand the finished record to a single consumer over a bounded
//! channel. Nothing else touches the result collection, so concurrent
//! handlers cannot lose updates.
//!
//! A failed request or an unparseable fragment still yields the snapshot;
//! items are never dropped here.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};
use url::Url;

use crate::application::listing::HoverParser;
use crate::domain::{CorrelationToken, ListItem};
use crate::infrastructure::parsing::{PageDocument, ParsingError, ParsingResult};
use crate::infrastructure::{Collector, CollectorError, PageRequest, gomunime};

pub struct DetailCorrelator {
    ajax_url: String,
    ajax_base: Url,
    hover: Arc<HoverParser>,
    tx: mpsc::Sender<ListItem>,
    rx: mpsc::Receiver<ListItem>,
    issued: usize,
}

impl DetailCorrelator {
    pub fn new(ajax_url: &str, hover: Arc<HoverParser>, capacity: usize) -> ParsingResult<Self> {
        let ajax_base = Url::parse(ajax_url).map_err(|e| ParsingError::UrlResolutionFailed {
            url: ajax_url.to_string(),
            reason: e.to_string(),
            base_url: None,
        })?;
        let (tx, rx) = mpsc::channel(capacity.max(1));

        Ok(Self {
            ajax_url: ajax_url.to_string(),
            ajax_base,
            hover,
            tx,
            rx,
            issued: 0,
        })
    }

    /// Number of detail requests issued so far.
    pub const fn issued(&self) -> usize {
        self.issued
    }

    /// Send the hover request for one card.
    pub fn issue(&mut self, collector: &mut Collector, item: ListItem) {
        let post_id = item.post_id.clone();
        let request = PageRequest::post_form(self.ajax_url.clone(), gomunime::hover_request_body(&post_id));
        let token = CorrelationToken::new(item, post_id);
        debug!("Issuing detail request {} for post {}", token.id(), token.post_id());

        let hover = Arc::clone(&self.hover);
        let base = self.ajax_base.clone();
        let tx = self.tx.clone();
        collector.request(request, token, move |token, outcome| async move {
            let record = resolve(&hover, &base, token, outcome);
            if tx.send(record).await.is_err() {
                warn!("Result consumer closed before a detail record was delivered");
            }
        });
        self.issued += 1;
    }

    /// Drain every outstanding detail request.
    ///
    /// Records come back in completion order.
    pub async fn finish(self, collector: &mut Collector) -> Vec<ListItem> {
        let Self { tx, mut rx, issued, .. } = self;
        drop(tx);

        let consume = async move {
            let mut merged = Vec::with_capacity(issued);
            while let Some(record) = rx.recv().await {
                merged.push(record);
            }
            merged
        };
        let ((), merged) = tokio::join!(collector.wait(), consume);

        debug!("Merged {} of {} detail records", merged.len(), issued);
        merged
    }
}

/// Merge the hover fragment into the token's snapshot.
///
/// Synchronous so the parsed document never lives across an await.
fn resolve(
    hover: &HoverParser,
    base: &Url,
    token: CorrelationToken<ListItem>,
    outcome: Result<String, CollectorError>,
) -> ListItem {
    let id = token.id();
    let mut record = token.into_snapshot();

    match outcome {
        Ok(body) => {
            let payload = hover.parse(&PageDocument::parse_fragment(&body, base));
            if payload.is_empty() {
                debug!("Detail response {} for post {} had no hover fields", id, record.post_id);
            } else {
                record.merge_detail(payload);
            }
        }
        Err(_) => debug!("Keeping listing snapshot for post {}", record.post_id),
    }
    record
}
