// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Usage-figure scraping from pane output.
//!
//! Tools print usage in a few loose shapes; the scan is latest-first so
//! the freshest figures win, and a sample with nothing matched is dropped
//! so consumers can tell "no data" from "zero".

use coders_core::UsageSample;
use regex::Regex;
use std::sync::LazyLock;

// Allow expect here as the regexes are compile-time verified to be valid
#[allow(clippy::expect_used)]
static COST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)cost:\s*\$([0-9]+(?:\.[0-9]+)?)").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)tokens:\s*([0-9][0-9,]*)").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static API_CALLS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)api calls:\s*([0-9][0-9,]*)").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static SESSION_LIMIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)current session").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static WEEK_LIMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)current week \(all models\)").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static PCT_USED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{1,3})%\s*used").expect("constant regex pattern is valid"));

fn parse_count(raw: &str) -> Option<u64> {
    raw.replace(',', "").parse().ok()
}

/// The `NN% used` figure on the marker line or the line after it.
fn pct_near(lines: &[&str], idx: usize) -> Option<u8> {
    for line in lines.iter().skip(idx).take(2) {
        if let Some(cap) = PCT_USED.captures(line) {
            if let Ok(pct) = cap[1].parse::<u16>() {
                return Some(pct.min(100) as u8);
            }
        }
    }
    None
}

/// Scrape a usage sample from pane text. Returns `None` when nothing
/// matched at all.
pub fn parse_usage(pane_text: &str) -> Option<UsageSample> {
    let lines: Vec<&str> = pane_text.lines().collect();
    let mut sample = UsageSample::default();

    // Latest-first: walk from the bottom and keep the first hit per field.
    for (idx, line) in lines.iter().enumerate().rev() {
        if sample.cost.is_none() {
            if let Some(cap) = COST.captures(line) {
                sample.cost = Some(format!("${}", &cap[1]));
            }
        }
        if sample.tokens.is_none() {
            if let Some(cap) = TOKENS.captures(line) {
                sample.tokens = parse_count(&cap[1]);
            }
        }
        if sample.api_calls.is_none() {
            if let Some(cap) = API_CALLS.captures(line) {
                sample.api_calls = parse_count(&cap[1]);
            }
        }
        if sample.session_pct.is_none() && SESSION_LIMIT.is_match(line) {
            sample.session_pct = pct_near(&lines, idx);
        }
        if sample.week_pct.is_none() && WEEK_LIMIT.is_match(line) {
            sample.week_pct = pct_near(&lines, idx);
        }
    }

    if sample.is_empty() {
        None
    } else {
        Some(sample)
    }
}

#[cfg(test)]
#[path = "usage_tests.rs"]
mod tests;
