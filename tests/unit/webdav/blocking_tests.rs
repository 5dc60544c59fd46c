use std::thread;
use std::time::Duration;

use fast_webdav::DavError;
use fast_webdav::webdav::wait_for;

#[test]
fn test_wait_for_immediate_completion() {
    let value = wait_for(|done| {
        done.complete(42u32);
        Ok(())
    })
    .expect("completed");
    assert_eq!(value, 42);
}

#[test]
fn test_wait_for_completion_from_other_thread() {
    let value = wait_for(|done| {
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            done.complete("late".to_string());
        });
        Ok(())
    })
    .expect("completed");
    assert_eq!(value, "late");
}

#[test]
fn test_wait_for_dropped_completion_is_abandoned() {
    let err = wait_for::<u8, _>(|done| {
        thread::spawn(move || drop(done));
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(err, DavError::Abandoned));
}

#[test]
fn test_wait_for_start_error_surfaces() {
    let err = wait_for::<u8, _>(|_done| Err(DavError::InvalidArgument("bad".into()))).unwrap_err();
    assert!(matches!(err, DavError::InvalidArgument(msg) if msg == "bad"));
}
