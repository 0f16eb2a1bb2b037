// tests/moderation_tools.rs
//! Integration tests for the admin console: user actions, ban lookups and
//! the report queue.

mod common;
use butterfly_api::{ReportKind, ReportReason, ReportStatus};
use butterfly_client::features::UserActionForm;
use butterfly_client::{BanStatus, ClientError, QueryState, Screen};
use common::{ADMIN, BOB, admin, alice, app, bob, community, visit};

#[tokio::test]
async fn test_malformed_principal_never_reaches_backend() {
    let backend = community();
    let app = app(&backend);
    visit(&app, &admin(), "/moderation").await;

    let mut form = UserActionForm::new("");
    form.ban_reason = "spam".into();
    assert_eq!(
        app.moderation().ban(&admin(), &mut form).await,
        Err(ClientError::validation("Please enter a Principal ID"))
    );

    form.principal_input = "Not-A-Principal!".into();
    assert_eq!(
        app.moderation().ban(&admin(), &mut form).await,
        Err(ClientError::validation("Invalid Principal ID format"))
    );
    assert_eq!(
        app.notices().last().map(|n| n.message),
        Some("Invalid Principal ID format".to_string())
    );
    assert_eq!(backend.calls("ban_user"), 0);
}

#[tokio::test]
async fn test_ban_refreshes_lookup_and_clears_reason() {
    let backend = community();
    backend.set_eligible(&bob(), true);
    let app = app(&backend);
    visit(&app, &admin(), "/moderation").await;
    let me = Some(admin());
    let moderation = app.moderation();

    let before = moderation.ban_status(me.as_ref(), &bob()).await;
    assert_eq!(before, QueryState::Ready(BanStatus::Active));

    let mut form = UserActionForm::new(BOB);
    assert_eq!(
        moderation.ban(&admin(), &mut form).await,
        Err(ClientError::validation("Please enter a ban reason"))
    );

    form.ban_reason = "trolling".into();
    moderation.ban(&admin(), &mut form).await.expect("ban");
    assert!(form.ban_reason.is_empty());
    assert_eq!(form.principal_input, BOB);
    assert_eq!(
        app.notices().last().map(|n| n.message),
        Some("User has been banned successfully".to_string())
    );

    let after = moderation.ban_status(me.as_ref(), &bob()).await;
    assert_eq!(
        after,
        QueryState::Ready(BanStatus::Banned {
            reason: Some("trolling".into())
        })
    );

    moderation.unban(&admin(), &form).await.expect("unban");
    assert_eq!(
        moderation.ban_status(me.as_ref(), &bob()).await,
        QueryState::Ready(BanStatus::Active)
    );
}

#[tokio::test]
async fn test_banned_member_is_locked_out_on_next_login() {
    let backend = community();
    let app = app(&backend);
    visit(&app, &admin(), "/moderation").await;

    let mut form = UserActionForm::new(common::ALICE);
    form.ban_reason = "harassment".into();
    app.moderation().ban(&admin(), &mut form).await.expect("ban");

    app.logout();
    let screen = visit(&app, &alice(), "/feed").await;
    assert!(matches!(screen, Screen::Banned(ref view) if view.reason.as_deref() == Some("harassment")));
}

#[tokio::test]
async fn test_failed_action_notices_and_releases_control() {
    let backend = community();
    let app = app(&backend);
    // alice is not an admin, so the backend refuses
    visit(&app, &alice(), "/moderation").await;

    let mut form = UserActionForm::new(ADMIN);
    form.ban_reason = "coup".into();
    assert!(app.moderation().ban(&alice(), &mut form).await.is_err());
    assert_eq!(form.ban_reason, "coup");
    assert!(!app.moderation().is_acting());
    assert_eq!(
        app.notices().last().map(|n| n.message),
        Some("Action failed. Please try again.".to_string())
    );
}

#[tokio::test]
async fn test_report_queue_lifecycle() {
    let backend = community();
    let first = backend.seed_report(&alice(), "17");
    let second = backend.seed_report(&bob(), "18");
    let app = app(&backend);
    visit(&app, &admin(), "/moderation").await;
    let me = Some(admin());
    let moderation = app.moderation();
    let page = moderation.first_page();

    let reports = moderation.reports(me.as_ref(), page).await;
    assert_eq!(reports.value().map(Vec::len), Some(2));

    moderation.resolve(&admin(), first).await.expect("resolve");
    assert_eq!(backend.report_status(first), Some(ReportStatus::Reviewed));
    assert!(moderation.reports_need_fetch(me.as_ref(), page));

    moderation
        .remove_content(&admin(), second)
        .await
        .expect("remove");
    let reports = moderation.reports(me.as_ref(), page).await;
    assert_eq!(reports.value().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_any_member_can_file_a_report() {
    let backend = community();
    let app = app(&backend);
    visit(&app, &alice(), "/feed").await;

    app.moderation()
        .report_content(&alice(), "42", ReportKind::Message, ReportReason::OffTopic)
        .await
        .expect("report");
    assert_eq!(
        app.notices().last().map(|n| n.message),
        Some("Report submitted".to_string())
    );
    assert_eq!(
        app.moderation()
            .report_content(&alice(), "42", ReportKind::Profile, ReportReason::Other(" ".into()))
            .await,
        Err(ClientError::validation("Please describe the reason"))
    );
    assert_eq!(backend.calls("report_content"), 1);
}
