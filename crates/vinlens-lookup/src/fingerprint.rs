use crate::error::{LookupError, Result};
use rand::Rng;
use std::sync::Arc;

/// Pool of browser-like user agent strings, one chosen per request.
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Arc<[String]>,
}

impl UserAgentPool {
    /// Build a pool, ignoring blank entries.
    pub fn new<I, S>(agents: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let agents: Vec<String> = agents
            .into_iter()
            .map(Into::into)
            .filter(|agent| !agent.trim().is_empty())
            .collect();

        if agents.is_empty() {
            return Err(LookupError::UserAgents(
                "at least one non-blank user agent is required".to_string(),
            ));
        }

        Ok(Self {
            agents: agents.into(),
        })
    }

    /// Pick a user agent uniformly at random.
    #[must_use]
    pub fn pick(&self) -> &str {
        let idx = rand::thread_rng().gen_range(0..self.agents.len());
        &self.agents[idx]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_pool() {
        let result = UserAgentPool::new(Vec::<String>::new());
        assert!(matches!(result, Err(LookupError::UserAgents(_))));

        let result = UserAgentPool::new(["", "   "]);
        assert!(matches!(result, Err(LookupError::UserAgents(_))));
    }

    #[test]
    fn test_blank_entries_dropped() {
        let pool = UserAgentPool::new(["agent-a", " ", "agent-b"]).expect("valid pool");
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_pick_stays_in_pool() {
        let pool = UserAgentPool::new(["agent-a", "agent-b", "agent-c"]).expect("valid pool");
        for _ in 0..50 {
            assert!(["agent-a", "agent-b", "agent-c"].contains(&pool.pick()));
        }
    }

    #[test]
    fn test_pick_variation() {
        let pool = UserAgentPool::new(["agent-a", "agent-b", "agent-c"]).expect("valid pool");

        // Probabilistic, but 1 in 3^49 to fail
        let first = pool.pick().to_string();
        let all_same = (0..50).all(|_| pool.pick() == first);
        assert!(!all_same, "Expected variation in user agents");
    }
}
