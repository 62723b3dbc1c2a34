use super::*;
use crate::embedding::{CountingEncoder, CountingScorer, FailingEncoder, FailingScorer};
use std::sync::Arc;

const EPSILON: f32 = 1e-6;

fn counting_distance() -> DistanceRetriever<CountingEncoder> {
    DistanceRetriever::new(CountingEncoder::new(), SigmoidScale::new(0.3, 10.0), 100)
}

fn counting_cross_encoder(raw: f32) -> CrossEncoderRetriever<CountingScorer> {
    CrossEncoderRetriever::new(CountingScorer::new(raw), SigmoidScale::new(-4.0, 0.3), 100)
}

mod sigmoid_tests {
    use super::*;

    #[test]
    fn test_shift_maps_to_half() {
        let sigmoid = SigmoidScale::new(-4.0, 0.3);
        assert!((sigmoid.apply(-4.0) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_matches_logistic_formula() {
        let sigmoid = SigmoidScale::new(0.3, 10.0);
        let raw = 0.45f32;
        let expected = 1.0 / (1.0 + (-10.0f32 * (raw - 0.3)).exp());
        assert_eq!(sigmoid.apply(raw), expected);
    }

    #[test]
    fn test_monotonic_and_bounded() {
        let sigmoid = SigmoidScale::new(-4.0, 0.3);
        let mut previous = 0.0;
        for raw in [-40.0f32, -10.0, -4.5, -4.0, 0.0, 2.0, 40.0] {
            let value = sigmoid.apply(raw);
            assert!((0.0..=1.0).contains(&value));
            assert!(value >= previous);
            previous = value;
        }
    }
}

mod cosine_tests {
    use super::*;

    #[test]
    fn test_identical_vectors_have_zero_distance() {
        let v = [0.6, 0.8, 0.0];
        assert!(cosine_distance(&v, &v).unwrap().abs() < EPSILON);
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]).unwrap() - 1.0).abs() < EPSILON);
        assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]).unwrap() - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_scale_invariant() {
        let d = cosine_distance(&[1.0, 2.0, 3.0], &[10.0, 20.0, 30.0]).unwrap();
        assert!(d.abs() < EPSILON);
    }

    #[test]
    fn test_zero_vector_is_unrelated() {
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), 1.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = cosine_distance(&[1.0, 0.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            RetrievalError::DimensionMismatch {
                query: 2,
                snippet: 1
            }
        ));
    }
}

mod distance_retriever_tests {
    use super::*;

    #[test]
    fn test_repeated_pair_is_served_from_cache() {
        let retriever = counting_distance();

        let first = retriever.predict("read a file", "fn read_file() {}").unwrap();
        assert_eq!(retriever.encoder().calls(), 2);

        let second = retriever.predict("read a file", "fn read_file() {}").unwrap();
        assert_eq!(retriever.encoder().calls(), 2);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_cache_keys_include_query_flag() {
        let retriever = counting_distance();

        retriever.predict("same text", "same text").unwrap();
        assert_eq!(retriever.encoder().calls(), 2);
        assert!(retriever.cache().contains("same text", true));
        assert!(retriever.cache().contains("same text", false));

        retriever.predict("same text", "other").unwrap();
        assert_eq!(retriever.encoder().calls(), 3);
    }

    #[test]
    fn test_identical_query_and_snippet_is_not_an_error() {
        let retriever = counting_distance();
        let score = retriever.predict("abc", "abc").unwrap();

        assert!((score - SigmoidScale::new(0.3, 10.0).apply(0.0)).abs() < EPSILON);
    }

    #[test]
    fn test_related_scores_lower_than_unrelated() {
        let retriever = counting_distance();

        // 'a' and 'd' agree modulo 3 in the counting encoder; 'a' and 'b' do not.
        let related = retriever.predict("alpha", "delta").unwrap();
        let unrelated = retriever.predict("alpha", "bravo").unwrap();

        assert!(related < unrelated);
        assert!((retriever.raw_distance("alpha", "bravo").unwrap() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_shared_query_embedding_reused_across_snippets() {
        let retriever = counting_distance();

        retriever.predict("query", "first").unwrap();
        retriever.predict("query", "second").unwrap();

        assert_eq!(retriever.encoder().calls(), 3);
    }

    #[test]
    fn test_encoder_failure_propagates_and_is_not_cached() {
        let retriever = DistanceRetriever::new(FailingEncoder::new(), SigmoidScale::new(0.3, 10.0), 10);

        let err = retriever.predict("q", "s").unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(_)));
        assert!(!retriever.cache().contains("q", true));

        let _ = retriever.predict("q", "s");
        assert_eq!(retriever.encoder().calls(), 2);
    }

    #[test]
    fn test_with_defaults_uses_distance_constants() {
        let retriever = DistanceRetriever::with_defaults(CountingEncoder::new());
        assert_eq!(
            retriever.sigmoid(),
            SigmoidScale::new(
                crate::constants::DISTANCE_SIGMOID_SHIFT,
                crate::constants::DISTANCE_SIGMOID_SCALE
            )
        );
        assert_eq!(retriever.kind(), "distance");
    }

    #[test]
    fn test_with_stub_embedder() {
        let embedder = crate::embedding::BertEmbedder::stub().unwrap();
        let retriever = DistanceRetriever::with_defaults(embedder);

        let same = retriever.predict("sort a vector", "sort a vector").unwrap();
        let different = retriever.predict("sort a vector", "open a tcp socket").unwrap();

        assert!(same < different);
    }
}

mod cross_encoder_retriever_tests {
    use super::*;

    #[test]
    fn test_repeated_pair_is_served_from_cache() {
        let retriever = counting_cross_encoder(1.5);

        let first = retriever.predict("http get", "reqwest::get(url)").unwrap();
        let second = retriever.predict("http get", "reqwest::get(url)").unwrap();

        assert_eq!(retriever.scorer().calls(), 1);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_pair_order_matters() {
        let retriever = counting_cross_encoder(0.0);

        retriever.predict("a", "b").unwrap();
        retriever.predict("b", "a").unwrap();

        assert_eq!(retriever.scorer().calls(), 2);
    }

    #[test]
    fn test_normalizes_raw_score() {
        let retriever = counting_cross_encoder(-4.0);
        let score = retriever.predict("q", "s").unwrap();
        assert!((score - 0.5).abs() < EPSILON);
        assert_eq!(retriever.raw_score("q", "s").unwrap(), -4.0);
    }

    #[test]
    fn test_confident_logit_gives_low_distance() {
        let related = counting_cross_encoder(2.0).predict("q", "s").unwrap();
        let unrelated = counting_cross_encoder(-10.0).predict("q", "s").unwrap();
        let expected = 1.0 - SigmoidScale::new(-4.0, 0.3).apply(2.0);

        assert!((related - expected).abs() < EPSILON);
        assert!(related < 0.5 && unrelated > 0.5);
        assert!((related + unrelated - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_scorer_failure_propagates() {
        let retriever = CrossEncoderRetriever::with_defaults(FailingScorer);

        let err = retriever.predict("q", "s").unwrap_err();
        assert!(matches!(err, RetrievalError::Reranker(_)));
        assert!(err.to_string().contains("model unavailable"));
        assert!(!retriever.cache().contains("q", "s"));
    }

    #[test]
    fn test_with_stub_reranker() {
        let reranker = crate::embedding::Reranker::stub().unwrap();
        let retriever = CrossEncoderRetriever::with_defaults(reranker);

        let related = retriever
            .predict("parse json", "serde_json parse json string")
            .unwrap();
        let unrelated = retriever
            .predict("parse json", "draw a circle on canvas")
            .unwrap();

        assert!(related < unrelated);
        assert_eq!(retriever.kind(), "cross_encoder");
    }
}

mod cache_tests {
    use super::*;

    #[test]
    fn test_embedding_cache_roundtrip() {
        let cache = EmbeddingCache::with_capacity(10);
        let embedding: Arc<[f32]> = vec![1.0, 2.0].into();

        assert!(cache.get("t", true).is_none());
        cache.insert("t", true, Arc::clone(&embedding));

        assert!(Arc::ptr_eq(&cache.get("t", true).unwrap(), &embedding));
        assert!(cache.get("t", false).is_none());

        cache.run_pending_tasks();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_embedding_cache_is_bounded() {
        let cache = EmbeddingCache::with_capacity(5);
        for i in 0..100 {
            cache.insert(&format!("text-{i}"), false, vec![i as f32].into());
        }

        cache.run_pending_tasks();
        assert!(cache.len() <= 5);
    }

    #[test]
    fn test_score_cache_clear() {
        let cache = ScoreCache::with_capacity(10);
        cache.insert("q", "s", 0.25);
        assert_eq!(cache.get("q", "s"), Some(0.25));

        cache.clear();
        cache.run_pending_tasks();
        assert!(cache.is_empty());
        assert!(!cache.contains("q", "s"));
    }
}

mod fixed_retriever_tests {
    use super::*;

    #[test]
    fn test_fixed_retriever_counts_calls() {
        let retriever = FixedRetriever::new(0.42);
        assert_eq!(retriever.predict("q", "s").unwrap(), 0.42);
        retriever.set_score(0.1);
        assert_eq!(retriever.predict("q", "s").unwrap(), 0.1);
        assert_eq!(retriever.calls(), 2);
    }

    #[test]
    fn test_failing_retriever() {
        let retriever = FixedRetriever::failing("boom");
        assert!(retriever.predict("q", "s").is_err());
        assert_eq!(retriever.calls(), 1);
    }
}
