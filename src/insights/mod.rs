//! Rule-based scouting insights.
//!
//! Each rule looks at the aggregates it needs and produces at most one
//! finding. Rules are evaluated in a fixed order, which is also the order
//! findings are presented in. When no rule fires a single fallback
//! finding is returned, so the output is never empty.

pub mod rules;

use tracing::debug;

use crate::models::{Aggregates, Insight, InsightCategory};

pub use rules::default_rules;

/// Text of the finding emitted when no rule fires.
pub const NO_PATTERN_TEXT: &str =
    "No exploitable pattern found in the available data. Scout their recent VODs directly.";

/// A single scouting rule.
pub trait InsightRule: Send + Sync {
    /// Rule identifier for logging.
    fn name(&self) -> &'static str;

    /// Category attached to every finding from this rule.
    fn category(&self) -> InsightCategory;

    /// Evaluate the rule. Must return `None` when a required aggregate is
    /// missing rather than assuming defaults.
    fn evaluate(&self, aggregates: &Aggregates) -> Option<Insight>;
}

/// Ordered collection of rules.
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl InsightEngine {
    pub fn new(rules: Vec<Box<dyn InsightRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every rule in order and collect what fired.
    pub fn generate(&self, aggregates: &Aggregates) -> Vec<Insight> {
        let mut insights: Vec<Insight> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let finding = rule.evaluate(aggregates);
                if finding.is_some() {
                    debug!("Insight rule {} fired", rule.name());
                }
                finding
            })
            .collect();

        if insights.is_empty() {
            insights.push(Insight::new(InsightCategory::General, NO_PATTERN_TEXT));
        }

        insights
    }
}

/// Run the default rule set.
pub fn generate_insights(aggregates: &Aggregates) -> Vec<Insight> {
    InsightEngine::default().generate(aggregates)
}
