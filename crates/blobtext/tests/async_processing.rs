#![cfg(feature = "tokio-runtime")]
//! Running the stage on a tokio runtime.

use blobtext::{ContentExtractProcessor, ErrorCode, StageConfig};
use std::sync::Arc;

mod helpers;
use helpers::{content_of, file_record};

#[tokio::test]
async fn test_process_async_success() {
    let processor = Arc::new(ContentExtractProcessor::new(StageConfig::default()).unwrap());
    let output = processor
        .process_async(file_record("async-1", "a.txt", b"async text"))
        .await
        .unwrap();

    assert_eq!(content_of(&output), "async text");
    assert_eq!(output.id(), "async-1");
}

#[tokio::test]
async fn test_process_async_failure_is_classified() {
    let processor = Arc::new(ContentExtractProcessor::new(StageConfig::default()).unwrap());
    let err = processor
        .process_async(file_record("async-2", "b.bin", &[0x00, 0x01, 0x00, 0x02]))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::ParseFailed);
    assert_eq!(err.record_id(), "async-2");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_records_are_independent() {
    let processor = Arc::new(ContentExtractProcessor::new(StageConfig::default()).unwrap());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let processor = Arc::clone(&processor);
            let record = if i % 4 == 3 {
                file_record(&format!("rec-{i}"), "bad.bin", &[0x00, 0xff, 0x00, 0x01])
            } else {
                file_record(&format!("rec-{i}"), "ok.txt", format!("record number {i}").as_bytes())
            };
            tokio::spawn(async move { processor.process_async(record).await })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.await.unwrap();
        if i % 4 == 3 {
            assert_eq!(result.unwrap_err().code(), ErrorCode::ParseFailed);
        } else {
            assert_eq!(content_of(&result.unwrap()), format!("record number {i}"));
        }
    }
}
