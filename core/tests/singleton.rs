//! The process-wide handle. Lives in its own test binary so no other test
//! can initialize the shared slot first.

use std::sync::Arc;

use reader_core::credentials::NoToken;
use reader_core::{factory, ApiError, ClientConfig};

#[test]
fn factory_lifecycle() {
    assert!(matches!(factory::client(), Err(ApiError::NotInitialized)));

    let bad = ClientConfig::new("ftp://reader.example.com");
    assert!(matches!(
        factory::init(bad, Arc::new(NoToken)),
        Err(ApiError::Configuration(_))
    ));
    assert!(matches!(factory::client(), Err(ApiError::NotInitialized)));

    let config = ClientConfig::new("http://127.0.0.1:9");
    let first = factory::init(config.clone(), Arc::new(NoToken)).unwrap();
    assert_eq!(first.client().base_url(), "http://127.0.0.1:9");

    let threads: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| factory::client().unwrap() as *const _ as usize))
        .collect();
    for handle in threads {
        assert_eq!(handle.join().unwrap(), first as *const _ as usize);
    }
    assert!(std::ptr::eq(first, factory::client().unwrap()));

    let again = factory::init(config, Arc::new(NoToken));
    assert!(matches!(again, Err(ApiError::AlreadyInitialized)));
    assert!(std::ptr::eq(first, factory::client().unwrap()));
}
