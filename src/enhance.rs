use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(700);

pub const EXPANSION_SUFFIX: &str =
    " — Take a moment to reflect more deeply on how this applies to your daily life and growth.";

pub const SUGGESTED_ACTIONS: [&str; 2] = [
    "Try sharing your gratitude with someone today.",
    "Write a short letter expressing positivity toward a challenge.",
];

#[async_trait]
pub trait Enhancer: Send + Sync {
    async fn expand_prompt(&self, prompt: &str) -> Result<String>;

    async fn more_actions(&self, prompt: &str, existing: &[String]) -> Result<Vec<String>>;
}

#[derive(Debug, Clone)]
pub struct DelayedStub {
    delay: Duration,
}

impl DelayedStub {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for DelayedStub {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

#[async_trait]
impl Enhancer for DelayedStub {
    async fn expand_prompt(&self, prompt: &str) -> Result<String> {
        tokio::time::sleep(self.delay).await;
        Ok(format!("{prompt}{EXPANSION_SUFFIX}"))
    }

    async fn more_actions(&self, _prompt: &str, _existing: &[String]) -> Result<Vec<String>> {
        tokio::time::sleep(self.delay).await;
        Ok(SUGGESTED_ACTIONS.iter().map(|a| a.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn stub_appends_reflection_suffix() {
        let stub = DelayedStub::new(Duration::ZERO);
        let expanded = stub.expand_prompt("What made you laugh?").await.unwrap();
        assert!(expanded.starts_with("What made you laugh? — Take a moment"));
        assert!(expanded.ends_with("growth."));
    }

    #[tokio::test]
    async fn stub_returns_two_fixed_actions() {
        let stub = DelayedStub::new(Duration::ZERO);
        let actions = stub
            .more_actions("prompt", &["existing".to_string()])
            .await
            .unwrap();
        assert_eq!(actions, SUGGESTED_ACTIONS.map(String::from).to_vec());
    }

    #[tokio::test]
    async fn stub_waits_for_its_delay() {
        let stub = DelayedStub::new(Duration::from_millis(30));
        let started = std::time::Instant::now();
        stub.expand_prompt("x").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    struct Failing;

    #[async_trait]
    impl Enhancer for Failing {
        async fn expand_prompt(&self, _prompt: &str) -> Result<String> {
            Err(Error::Enhance {
                message: "offline".into(),
            })
        }

        async fn more_actions(&self, _prompt: &str, _existing: &[String]) -> Result<Vec<String>> {
            Err(Error::Enhance {
                message: "offline".into(),
            })
        }
    }

    #[tokio::test]
    async fn implementations_are_interchangeable_behind_the_trait() {
        let enhancers: Vec<Box<dyn Enhancer>> =
            vec![Box::new(DelayedStub::new(Duration::ZERO)), Box::new(Failing)];
        let mut outcomes = Vec::new();
        for enhancer in &enhancers {
            outcomes.push(enhancer.expand_prompt("p").await.is_ok());
        }
        assert_eq!(outcomes, vec![true, false]);
    }
}
