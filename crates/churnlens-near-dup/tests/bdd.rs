//! BDD-style scenario tests for body comparison.

use churnlens_near_dup::{BodyIndex, DEFAULT_THRESHOLD, PreparedBody, structural_similarity};

// ── Exact duplicates ─────────────────────────────────────────────

mod exact {
    use super::*;

    #[test]
    fn given_bodies_differing_only_in_comments_when_compared_then_exact() {
        let a = PreparedBody::new("func sum(xs []int) int {\n  t := 0\n  // loop\n  for _, x := range xs { t += x }\n  return t\n}");
        let b = PreparedBody::new("func sum(xs []int) int {\n\n  t := 0\n  for _, x := range xs { t += x }\n  # trailing\n  return t\n}");
        assert!(a.is_exact(&b));
        assert_eq!(a.similarity(&b), 1.0);
    }

    #[test]
    fn given_index_of_bodies_when_probing_then_only_equal_normalized_text_matches() {
        let index = BodyIndex::build(["return a + b", "return a - b", "  return a + b  "]);
        let probe = PreparedBody::new("return a + b");
        assert_eq!(index.exact_matches(&probe), vec![0, 2]);
    }
}

// ── Structural duplicates ────────────────────────────────────────

mod structural {
    use super::*;

    #[test]
    fn given_same_tokens_with_different_spacing_when_compared_then_similarity_one_but_not_exact() {
        let a = PreparedBody::new("func f(a int) int { return a*2 }");
        let b = PreparedBody::new("func f( a int ) int {\n return a * 2\n}");
        assert!(!a.is_exact(&b));
        assert_eq!(a.similarity(&b), 1.0);
    }

    #[test]
    fn given_renamed_identifier_when_compared_then_similarity_drops_below_one() {
        let s = structural_similarity(
            "func load(path string) error { return read(path) }",
            "func save(path string) error { return write(path) }",
        );
        assert!(s < 1.0 && s > 0.5, "{s}");
    }

    #[test]
    fn given_unrelated_bodies_when_compared_then_below_default_threshold() {
        let s = structural_similarity("x := map[string]int{}", "for i in range(10): print(i)");
        assert!(s < DEFAULT_THRESHOLD, "{s}");
    }
}
