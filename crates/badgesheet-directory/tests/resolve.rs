mod support;

use badgesheet_directory::{resolve_user_id, DirectoryError};
use support::{aliases, FakeDirectory};

#[tokio::test]
async fn finds_user_by_literal_email() {
    let directory = FakeDirectory::standard();
    let id = resolve_user_id(&directory, Some(&aliases()), " mpollich@email.com ")
        .await
        .expect("lookup");
    assert_eq!(id.as_deref(), Some("F67GH8IJK"));
    assert_eq!(directory.lookup_log(), vec!["mpollich@email.com"]);
}

#[tokio::test]
async fn substitutes_second_domain_for_first() {
    let directory = FakeDirectory::standard();
    let id = resolve_user_id(&directory, Some(&aliases()), "amorar@fearsol.com")
        .await
        .expect("lookup");
    assert_eq!(id.as_deref(), Some("J01KL2MNO"));
    assert_eq!(
        directory.lookup_log(),
        vec!["amorar@fearsol.com", "amorar@fearless.tech"]
    );
}

#[tokio::test]
async fn substitutes_first_domain_for_second() {
    let directory = FakeDirectory::standard();
    let id = resolve_user_id(&directory, Some(&aliases()), "tmccullough@fearless.tech")
        .await
        .expect("lookup");
    assert_eq!(id.as_deref(), Some("E56FG7HIJ"));
    assert_eq!(directory.lookup_log().len(), 2);
}

#[tokio::test]
async fn unknown_domain_is_not_retried() {
    let directory = FakeDirectory::standard();
    let id = resolve_user_id(&directory, Some(&aliases()), "nouser@email.com")
        .await
        .expect("lookup");
    assert_eq!(id, None);
    assert_eq!(directory.lookup_log(), vec!["nouser@email.com"]);
}

#[tokio::test]
async fn substitution_is_attempted_once() {
    let directory = FakeDirectory::standard();
    let id = resolve_user_id(&directory, Some(&aliases()), "ghost@fearless.tech")
        .await
        .expect("lookup");
    assert_eq!(id, None);
    assert_eq!(
        directory.lookup_log(),
        vec!["ghost@fearless.tech", "ghost@fearsol.com"]
    );
}

#[tokio::test]
async fn lookup_failure_still_tries_counterpart() {
    let directory = FakeDirectory::standard().fail_on("amorar@fearsol.com");
    let id = resolve_user_id(&directory, Some(&aliases()), "amorar@fearsol.com")
        .await
        .expect("counterpart answers");
    assert_eq!(id.as_deref(), Some("J01KL2MNO"));
}

#[tokio::test]
async fn no_aliases_means_no_retry() {
    let directory = FakeDirectory::standard();
    let id = resolve_user_id(&directory, None, "amorar@fearsol.com")
        .await
        .expect("lookup");
    assert_eq!(id, None);
    assert_eq!(directory.lookup_log().len(), 1);
}

#[tokio::test]
async fn blank_email_skips_lookup() {
    let directory = FakeDirectory::standard();
    let id = resolve_user_id(&directory, Some(&aliases()), "   ")
        .await
        .expect("lookup");
    assert_eq!(id, None);
    assert!(directory.lookup_log().is_empty());
}

#[tokio::test]
async fn failure_is_returned_when_no_attempt_finds_the_user() {
    let directory = FakeDirectory::standard().fail_on("ghost@fearless.tech");
    let err = resolve_user_id(&directory, Some(&aliases()), "ghost@fearless.tech")
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::Api(code) if code == "ratelimited"));
    assert_eq!(
        directory.lookup_log(),
        vec!["ghost@fearless.tech", "ghost@fearsol.com"]
    );
}

#[tokio::test]
async fn failure_without_counterpart_is_returned() {
    let directory = FakeDirectory::standard().fail_on("nouser@email.com");
    let result = resolve_user_id(&directory, Some(&aliases()), "nouser@email.com").await;
    assert!(matches!(result, Err(DirectoryError::Api(_))));
}
