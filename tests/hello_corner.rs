// tests/hello_corner.rs
//! Integration tests for the Hello Corner feed: composing, attachments and
//! optimistic reactions.

mod common;
use butterfly_api::{MediaBlob, Reaction, RemoteError};
use butterfly_client::ClientError;
use butterfly_client::features::MessageComposer;
use common::{alice, app, bob, community, entered, visit};
use std::sync::Arc;

#[tokio::test]
async fn test_post_resets_composer_and_refreshes_feed() {
    let backend = community();
    backend.seed_message(&bob(), "hi all");
    let app = app(&backend);
    visit(&app, &alice(), "/feed").await;
    let me = Some(alice());
    let feed = app.hello_corner();
    let page = feed.first_page();
    feed.messages(me.as_ref(), page).await;

    let mut composer = MessageComposer::new();
    assert_eq!(
        feed.post(&alice(), &mut composer).await,
        Err(ClientError::validation("Please enter a message"))
    );

    composer.text = "  hello from alice ".into();
    feed.attach_photo(&mut composer, MediaBlob::new("image/png", vec![1, 2, 3]))
        .expect("photo fits");
    assert_eq!(
        app.notices().last().map(|n| n.message),
        Some("Photo attached!".to_string())
    );

    feed.post(&alice(), &mut composer).await.expect("post");
    assert_eq!(composer, MessageComposer::default());
    assert!(feed.messages_need_fetch(me.as_ref(), page));

    let messages = feed.messages(me.as_ref(), page).await;
    let newest = messages.value().and_then(|m| m.first()).expect("message");
    assert_eq!(newest.text, "hello from alice");
    assert!(newest.photo.is_some());
}

#[tokio::test]
async fn test_attachment_checks() {
    let backend = community();
    let app = app(&backend);
    let feed = app.hello_corner();
    let mut composer = MessageComposer::new();

    let err = feed.attach_photo(&mut composer, MediaBlob::new("video/mp4", vec![0]));
    assert_eq!(err, Err(ClientError::validation("Please select an image file")));

    let too_big = MediaBlob::new("image/jpeg", vec![0; 5 * 1024 * 1024 + 1]);
    let err = feed.attach_photo(&mut composer, too_big);
    assert_eq!(err, Err(ClientError::validation("Image must be smaller than 5MB")));
    assert!(composer.photo().is_none());

    feed.attach_video(&mut composer, MediaBlob::new("video/webm", vec![0; 16]))
        .expect("video fits");
    assert!(composer.video().is_some());
    composer.remove_video();
    assert!(composer.video().is_none());
}

#[tokio::test]
async fn test_failed_post_keeps_composer() {
    let backend = community();
    backend.fail("create_hello_corner_message", RemoteError::transport("offline"));
    let app = app(&backend);
    visit(&app, &alice(), "/feed").await;

    let mut composer = MessageComposer::new();
    composer.text = "still here".into();
    assert!(app.hello_corner().post(&alice(), &mut composer).await.is_err());
    assert_eq!(composer.text, "still here");
    assert_eq!(
        app.notices().last().map(|n| n.message),
        Some("Failed to post message".to_string())
    );
    assert!(!app.hello_corner().is_posting());
}

#[tokio::test]
async fn test_reaction_toggle_sets_then_removes() {
    let backend = community();
    let msg = backend.seed_message(&bob(), "react to me");
    let app = app(&backend);
    visit(&app, &alice(), "/feed").await;
    let me = Some(alice());
    let feed = app.hello_corner();
    feed.reactions(me.as_ref(), msg).await;

    feed.toggle_reaction(&alice(), msg, Reaction::Like)
        .await
        .expect("like");
    let counts = feed.effective_reactions(me.as_ref(), msg);
    let counts = counts.value().expect("counts");
    assert_eq!(counts.likes, 1);
    assert_eq!(counts.user_reaction, Some(Reaction::Like));

    // clicking the current reaction removes it
    feed.toggle_reaction(&alice(), msg, Reaction::Like)
        .await
        .expect("unlike");
    assert_eq!(backend.calls("remove_reaction"), 1);
    let counts = feed.effective_reactions(me.as_ref(), msg);
    assert_eq!(counts.value().map(|c| c.likes), Some(0));
}

#[tokio::test]
async fn test_pending_reaction_is_overlaid_and_exclusive() -> anyhow::Result<()> {
    let backend = community();
    let msg = backend.seed_message(&bob(), "overlay");
    let app = Arc::new(app(&backend));
    visit(&app, &alice(), "/feed").await;
    let me = alice();
    app.hello_corner().reactions(Some(&me), msg).await;
    let hold = backend.hold("react_to_message");

    let task = {
        let app = Arc::clone(&app);
        let me = me.clone();
        tokio::spawn(async move {
            app.hello_corner()
                .toggle_reaction(&me, msg, Reaction::Dislike)
                .await
        })
    };
    entered(&hold).await?;

    let shown = app.hello_corner().effective_reactions(Some(&me), msg);
    assert_eq!(shown.value().map(|c| c.dislikes), Some(1));
    assert!(app.hello_corner().is_reacting(&me, msg));

    let second = app
        .hello_corner()
        .toggle_reaction(&me, msg, Reaction::Like)
        .await;
    assert_eq!(second, Err(ClientError::Busy));

    hold.release();
    task.await??;
    assert!(!app.hello_corner().is_reacting(&me, msg));
    let settled = app.hello_corner().effective_reactions(Some(&me), msg);
    assert_eq!(settled.value().map(|c| c.user_reaction), Some(Some(Reaction::Dislike)));
    assert_eq!(backend.calls("react_to_message"), 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_reaction_discards_overlay() {
    let backend = community();
    let msg = backend.seed_message(&bob(), "nope");
    backend.fail("react_to_message", RemoteError::rejected("Message not found"));
    let app = app(&backend);
    visit(&app, &alice(), "/feed").await;
    let me = Some(alice());
    let feed = app.hello_corner();
    feed.reactions(me.as_ref(), msg).await;

    assert!(feed.toggle_reaction(&alice(), msg, Reaction::Like).await.is_err());
    assert!(!feed.is_reacting(&alice(), msg));
    let counts = feed.effective_reactions(me.as_ref(), msg);
    assert_eq!(counts.value().map(|c| c.likes), Some(0));
    assert_eq!(
        app.notices().last().map(|n| n.message),
        Some("Failed to update reaction".to_string())
    );
}

#[tokio::test]
async fn test_abandoned_toggle_discards_overlay() -> anyhow::Result<()> {
    let backend = community();
    let msg = backend.seed_message(&bob(), "never confirmed");
    let app = Arc::new(app(&backend));
    visit(&app, &alice(), "/feed").await;
    let me = alice();
    app.hello_corner().reactions(Some(&me), msg).await;
    let hold = backend.hold("react_to_message");

    let task = {
        let app = Arc::clone(&app);
        let me = me.clone();
        tokio::spawn(async move {
            app.hello_corner()
                .toggle_reaction(&me, msg, Reaction::Like)
                .await
        })
    };
    entered(&hold).await?;
    assert!(app.hello_corner().is_reacting(&me, msg));
    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());
    hold.release();

    // server tallies show again and the message accepts a new toggle
    assert!(!app.hello_corner().is_reacting(&me, msg));
    let shown = app.hello_corner().effective_reactions(Some(&me), msg);
    assert_eq!(shown.value().map(|c| (c.likes, c.user_reaction)), Some((0, None)));

    app.hello_corner()
        .toggle_reaction(&me, msg, Reaction::Like)
        .await?;
    let shown = app.hello_corner().effective_reactions(Some(&me), msg);
    assert_eq!(shown.value().map(|c| c.likes), Some(1));
    Ok(())
}
