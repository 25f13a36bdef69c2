//! Property-based tests for run ordering.
//!
//! Uses proptest to validate:
//! - An identity run reproduces any single-spaced input, overlap included
//! - Sequential and concurrent runs produce identical text

use proptest::prelude::*;
use retexto_core::WordCountEstimator;
use retexto_engine::{
    ExecutionMode, FragmenterConfig, IdentityProcessor, Input, ProcessingPolicy, RewritePipeline,
};

fn sentences() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-záéñ]{1,6}[.?]?", 1..60).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn prop_identity_run_reproduces_input(
        text in sentences(),
        fragment_size in 1usize..8,
        overlap_seed in 0usize..8,
        concurrency in 1usize..6,
    ) {
        let overlap = overlap_seed % fragment_size;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let pipeline = RewritePipeline::builder(IdentityProcessor)
            .estimator(WordCountEstimator)
            .fragmenter_config(FragmenterConfig::uniform(0, fragment_size, overlap).unwrap())
            .policy(ProcessingPolicy::default().with_concurrency(concurrency))
            .build()
            .unwrap();

        let sequential = runtime
            .block_on(pipeline.run_with_mode(Input::from_text(text.clone()), ExecutionMode::Sequential))
            .unwrap();
        let concurrent = runtime
            .block_on(pipeline.run_with_mode(Input::from_text(text.clone()), ExecutionMode::Concurrent))
            .unwrap();

        prop_assert_eq!(&sequential.text, &text);
        prop_assert_eq!(&concurrent.text, &text);
        prop_assert!(concurrent.fallbacks.is_empty());
    }
}
