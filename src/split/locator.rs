//! Boundary location over a parsed document body.

use crate::error::{Error, Result};
use crate::model::DocumentBody;

use super::plan::SplitPlan;
use super::policy::SplitPolicy;

/// Compute the split plan for a body under the given policy.
///
/// `naming_rows` is the naming-table length; the fixed-count policy
/// uses it as the number of parts.
///
/// Fails with [`Error::EmptyInput`] on a body with zero nodes and with
/// [`Error::InsufficientParts`] when the policy yields no ranges.
pub fn locate(body: &DocumentBody, policy: &SplitPolicy, naming_rows: usize) -> Result<SplitPlan> {
    if body.is_empty() {
        return Err(Error::EmptyInput);
    }

    let plan = match policy {
        SplitPolicy::FixedCount => fixed_count(body.node_count(), naming_rows)?,
        SplitPolicy::Marker(marker) => by_marker(body, marker)?,
        SplitPolicy::ExplicitCounts(counts) => by_counts(body.node_count(), counts)?,
    };

    log::debug!("split plan {plan} over {} nodes", body.node_count());
    Ok(plan)
}

/// Divide `node_count` nodes into `parts` ranges as evenly as
/// possible; the first `node_count % parts` ranges get one extra node.
fn fixed_count(node_count: usize, parts: usize) -> Result<SplitPlan> {
    if parts == 0 {
        return Err(Error::InsufficientParts);
    }

    let chunk = node_count / parts;
    let remainder = node_count % parts;

    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let len = chunk + usize::from(i < remainder);
        ranges.push(start..start + len);
        start += len;
    }

    Ok(SplitPlan::from_ranges(ranges))
}

/// One range per marker node, marker-inclusive to next-marker-exclusive.
fn by_marker(body: &DocumentBody, marker: &str) -> Result<SplitPlan> {
    let needle = marker.to_lowercase();
    let opens: Vec<usize> = body
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| node.text().to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect();

    if opens.is_empty() {
        return Err(Error::InsufficientParts);
    }

    if opens[0] > 0 {
        log::debug!("discarding {} nodes before the first marker", opens[0]);
    }

    let node_count = body.node_count();
    let ranges = opens
        .iter()
        .enumerate()
        .map(|(k, &start)| {
            let end = opens.get(k + 1).copied().unwrap_or(node_count);
            start..end
        })
        .collect();

    Ok(SplitPlan::from_ranges(ranges))
}

/// Cumulative ranges from caller-supplied counts, validated to cover
/// the node sequence exactly.
fn by_counts(node_count: usize, counts: &[usize]) -> Result<SplitPlan> {
    if counts.is_empty() {
        return Err(Error::InsufficientParts);
    }

    let supplied: usize = counts.iter().sum();
    if supplied != node_count {
        return Err(Error::CountCoverageMismatch {
            expected: node_count,
            supplied,
        });
    }

    let mut ranges = Vec::with_capacity(counts.len());
    let mut start = 0;
    for &count in counts {
        ranges.push(start..start + count);
        start += count;
    }

    Ok(SplitPlan::from_ranges(ranges))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Body with one paragraph per entry.
    fn body_with(texts: &[&str]) -> DocumentBody {
        let mut xml = String::from(r#"<w:document xmlns:w="ns"><w:body>"#);
        for text in texts {
            xml.push_str(&format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>"));
        }
        xml.push_str("</w:body></w:document>");
        DocumentBody::parse(xml.as_bytes()).unwrap()
    }

    fn plain_body(nodes: usize) -> DocumentBody {
        let texts: Vec<String> = (0..nodes).map(|i| format!("node {i}")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        body_with(&refs)
    }

    #[test]
    fn test_fixed_even_split() {
        let plan = locate(&plain_body(9), &SplitPolicy::FixedCount, 3).unwrap();
        assert_eq!(plan.range(0), Some(0..3));
        assert_eq!(plan.range(1), Some(3..6));
        assert_eq!(plan.range(2), Some(6..9));
    }

    #[test]
    fn test_fixed_remainder_goes_first() {
        let plan = locate(&plain_body(10), &SplitPolicy::FixedCount, 3).unwrap();
        assert_eq!(plan.range(0), Some(0..4));
        assert_eq!(plan.range(1), Some(4..7));
        assert_eq!(plan.range(2), Some(7..10));
    }

    #[test]
    fn test_fixed_is_balanced_and_covering() {
        for nodes in 1..40 {
            for parts in 1..=nodes {
                let plan = locate(&plain_body(nodes), &SplitPolicy::FixedCount, parts).unwrap();
                assert_eq!(plan.part_count(), parts);
                assert!(plan.covers_all(nodes));

                let sizes: Vec<usize> = plan.iter().map(|r| r.len()).collect();
                let max = sizes.iter().max().unwrap();
                let min = sizes.iter().min().unwrap();
                assert!(max - min <= 1, "{nodes} nodes into {parts}: {sizes:?}");
            }
        }
    }

    #[test]
    fn test_fixed_more_parts_than_nodes() {
        let plan = locate(&plain_body(2), &SplitPolicy::FixedCount, 4).unwrap();
        assert_eq!(plan.part_count(), 4);
        assert_eq!(plan.range(0), Some(0..1));
        assert_eq!(plan.range(1), Some(1..2));
        // Tail ranges are empty; the partitioner reports them per index.
        assert_eq!(plan.range(2), Some(2..2));
        assert_eq!(plan.range(3), Some(2..2));
    }

    #[test]
    fn test_fixed_zero_parts() {
        let result = locate(&plain_body(5), &SplitPolicy::FixedCount, 0);
        assert!(matches!(result, Err(Error::InsufficientParts)));
    }

    #[test]
    fn test_marker_ranges() {
        // Markers at indices 2, 5, 9 of 12 nodes.
        let texts: Vec<String> = (0..12)
            .map(|i| {
                if i == 2 || i == 5 || i == 9 {
                    format!("POWER OF ATTORNEY no. {i}")
                } else {
                    format!("clause {i}")
                }
            })
            .collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let body = body_with(&refs);

        let plan = locate(&body, &SplitPolicy::marker("power of attorney"), 3).unwrap();
        assert_eq!(plan.part_count(), 3);
        assert_eq!(plan.range(0), Some(2..5));
        assert_eq!(plan.range(1), Some(5..9));
        assert_eq!(plan.range(2), Some(9..12));
        assert!(!plan.covers_all(12));
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        let body = body_with(&["Mandate one", "body", "MANDATE two"]);
        let plan = locate(&body, &SplitPolicy::marker("mAnDaTe"), 2).unwrap();
        assert_eq!(plan.part_count(), 2);
        assert_eq!(plan.range(0), Some(0..2));
        assert_eq!(plan.range(1), Some(2..3));
    }

    #[test]
    fn test_marker_count_ignores_naming_rows() {
        let body = body_with(&["HEADER a", "x", "HEADER b", "y", "HEADER c"]);
        // Only one naming row, still three marker parts.
        let plan = locate(&body, &SplitPolicy::marker("HEADER"), 1).unwrap();
        assert_eq!(plan.part_count(), 3);
    }

    #[test]
    fn test_marker_none_matches() {
        let body = body_with(&["alpha", "beta"]);
        let result = locate(&body, &SplitPolicy::marker("HEADER"), 2);
        assert!(matches!(result, Err(Error::InsufficientParts)));
    }

    #[test]
    fn test_explicit_counts() {
        let plan = locate(&plain_body(6), &SplitPolicy::explicit_counts(vec![1, 2, 3]), 3).unwrap();
        assert_eq!(plan.range(0), Some(0..1));
        assert_eq!(plan.range(1), Some(1..3));
        assert_eq!(plan.range(2), Some(3..6));
    }

    #[test]
    fn test_explicit_counts_must_cover() {
        let result = locate(&plain_body(6), &SplitPolicy::explicit_counts(vec![1, 2]), 2);
        assert!(matches!(
            result,
            Err(Error::CountCoverageMismatch {
                expected: 6,
                supplied: 3
            })
        ));
    }

    #[test]
    fn test_explicit_counts_empty() {
        let result = locate(&plain_body(6), &SplitPolicy::explicit_counts(vec![]), 0);
        assert!(matches!(result, Err(Error::InsufficientParts)));
    }

    #[test]
    fn test_empty_body_fails_all_policies() {
        let body =
            DocumentBody::parse(br#"<w:document xmlns:w="ns"><w:body></w:body></w:document>"#)
                .unwrap();
        for policy in [
            SplitPolicy::FixedCount,
            SplitPolicy::marker("x"),
            SplitPolicy::explicit_counts(vec![1]),
        ] {
            let result = locate(&body, &policy, 3);
            assert!(matches!(result, Err(Error::EmptyInput)), "{policy}");
        }
    }
}
