//! Brute-force cosine index kept in memory.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CofounderError;

use super::{SearchMatch, VectorIndex, VectorRecord};

#[derive(Default)]
pub struct MemoryIndex {
    records: RwLock<Vec<VectorRecord>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<(), CofounderError> {
        let mut stored = self.records.write().await;
        for record in records {
            match stored.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record,
                None => stored.push(record),
            }
        }
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        user_id: &str,
    ) -> Result<Vec<SearchMatch>, CofounderError> {
        let stored = self.records.read().await;
        let mut matches: Vec<SearchMatch> = stored
            .iter()
            .filter(|r| r.metadata.user_id == user_id)
            .map(|r| SearchMatch {
                id: r.id.clone(),
                score: cosine(vector, &r.values),
                metadata: Some(r.metadata.clone()),
            })
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn health(&self) -> Result<(), CofounderError> {
        Ok(())
    }
}
