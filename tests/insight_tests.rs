// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use nestegg::error::{NesteggError, Result};
use nestegg::insight::{
    Insight, InsightProvider, build_prompt, generate_insight, parse_insight_text,
};
use nestegg::ledger::AssetSummary;
use rust_decimal::Decimal;

struct Failing;

impl InsightProvider for Failing {
    fn analyze(&self, _assets: &[AssetSummary]) -> Result<Insight> {
        Err(NesteggError::Insight("service unavailable".into()))
    }
}

struct Canned(Insight);

impl InsightProvider for Canned {
    fn analyze(&self, _assets: &[AssetSummary]) -> Result<Insight> {
        Ok(self.0.clone())
    }
}

fn sample_assets() -> Vec<AssetSummary> {
    vec![
        AssetSummary {
            name: "Brokerage".into(),
            category: "投资".into(),
            value: Decimal::new(1234567, 2),
        },
        AssetSummary {
            name: "Mortgage".into(),
            category: "负债".into(),
            value: Decimal::from(80000),
        },
    ]
}

#[test]
fn provider_failure_yields_fallback() {
    let insight = generate_insight(Some(&Failing), &sample_assets());
    assert_eq!(insight, Insight::fallback());
    assert_eq!(insight.risk_level, "unknown");
    assert!(!insight.suggestions.is_empty());
}

#[test]
fn missing_provider_yields_fallback() {
    assert_eq!(generate_insight(None, &[]), Insight::fallback());
}

#[test]
fn provider_answer_is_passed_through() {
    let answer = Insight {
        summary: "Heavily leveraged".into(),
        suggestions: vec!["Pay down the mortgage".into()],
        risk_level: "high".into(),
    };
    let canned = Canned(answer.clone());
    assert_eq!(generate_insight(Some(&canned), &sample_assets()), answer);
}

#[test]
fn parses_fenced_model_reply() {
    let reply = "```json\n{\"summary\": \"Balanced\", \"suggestions\": [\"Rebalance yearly\"], \
                 \"riskLevel\": \"medium\"}\n```";
    let insight = parse_insight_text(reply).unwrap();
    assert_eq!(insight.summary, "Balanced");
    assert_eq!(insight.suggestions, vec!["Rebalance yearly"]);
    assert_eq!(insight.risk_level, "medium");
}

#[test]
fn rejects_unusable_replies() {
    assert!(matches!(
        parse_insight_text("I cannot help with that."),
        Err(NesteggError::Insight(_))
    ));
    assert!(matches!(
        parse_insight_text("{\"summary\": \"  \", \"riskLevel\": \"low\"}"),
        Err(NesteggError::Insight(_))
    ));
    assert!(matches!(
        parse_insight_text("{\"summary\": \"ok\"}"),
        Err(NesteggError::Serialization(_))
    ));
}

#[test]
fn prompt_lists_every_asset() {
    let prompt = build_prompt(&sample_assets());
    assert!(prompt.contains("- Brokerage [投资]: 12345.67"));
    assert!(prompt.contains("- Mortgage [负债]: 80000.00"));
    assert!(prompt.contains("riskLevel"));
    assert!(build_prompt(&[]).contains("no assets recorded"));
}
