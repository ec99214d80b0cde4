use uuid::Uuid;

/// Carrier linking one outgoing detail request to the record that issued it.
///
/// The token owns a snapshot of the record taken when the request was issued.
/// Not `Clone`: exactly one token exists per request and it
/// is consumed when the response handler runs.
#[derive(Debug)]
pub struct CorrelationToken<T> {
    id: Uuid,
    post_id: String,
    snapshot: T,
}

impl<T> CorrelationToken<T> {
    pub fn new(snapshot: T, post_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id: post_id.into(),
            snapshot,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn snapshot(&self) -> &T {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> T {
        self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_distinct_per_request() {
        let a = CorrelationToken::new("same", "7");
        let b = CorrelationToken::new("same", "7");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.post_id(), "7");
        assert_eq!(b.into_snapshot(), "same");
    }
}
