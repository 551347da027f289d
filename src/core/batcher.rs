use std::time::Duration;

/// Ordered chunks of subject ids, each at most `batch_size` long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan<'a> {
    chunks: Vec<&'a [String]>,
}

impl<'a> BatchPlan<'a> {
    pub fn chunks(&self) -> &[&'a [String]] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Progress of a batched mutation, used for tracing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchState {
    Pending { total_chunks: usize },
    Sending { chunk: usize, total_chunks: usize },
    Completed { chunks: usize },
    Aborted { chunk: usize, result_code: String },
}

/// Splits subject lists into fixed-size chunks and paces the gaps between them.
#[derive(Debug, Clone)]
pub struct Batcher {
    max_changes_per_query: usize,
    sleep_between_changes: Option<Duration>,
}

impl Batcher {
    pub fn new(max_changes_per_query: usize, sleep_between_changes: Option<Duration>) -> Self {
        Self {
            max_changes_per_query: max_changes_per_query.max(1),
            sleep_between_changes: sleep_between_changes.filter(|d| !d.is_zero()),
        }
    }

    /// Walks the list the way the service expects: take up to a full batch,
    /// stop on an empty slice or on a short (final) one.
    pub fn plan<'a>(&self, subject_ids: &'a [String]) -> BatchPlan<'a> {
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.max_changes_per_query).min(subject_ids.len());
            let chunk = &subject_ids[start..end];
            if chunk.is_empty() {
                break;
            }
            chunks.push(chunk);
            if chunk.len() < self.max_changes_per_query {
                break;
            }
            start = end;
        }

        BatchPlan { chunks }
    }

    /// Waits between two chunks, if pacing is enabled.
    pub async fn pause(&self) {
        if let Some(delay) = self.sleep_between_changes {
            tracing::debug!("Pacing: sleeping {:?} before next chunk", delay);
            tokio::time::sleep(delay).await;
        }
    }
}
