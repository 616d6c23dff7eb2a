use crate::shared::usecase::UseCase;
use actix_web::rt::time::sleep;
use nudge_domain::{
    checkout_link, distinct_viewed_products, ChannelKind, ReminderMessage, Urgency, User,
    ViewEvent, ID,
};
use nudge_infra::{ComposeRequest, NudgeContext};
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{info, warn};

/// Scans recent view events for abandoned carts and records one SMS reminder
/// per eligible user. One execution is one scanner tick.
#[derive(Debug)]
pub struct ScanAbandonedCartsUseCase;

/// Counters emitted after every tick
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TickSummary {
    pub users_scanned: usize,
    pub skipped_cooldown: usize,
    pub skipped_error: usize,
    pub users_processed: usize,
    pub messages_recorded: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    /// The initial event batch could not be fetched. The whole tick is
    /// abandoned; the next tick is unaffected.
    EventFetch(String),
    /// Another tick is already running (timer or manual trigger)
    TickInProgress,
}

/// What happened to a single user group within a tick
#[derive(Debug)]
enum UserOutcome {
    Reminded,
    InCooldown,
    Skipped(SkipReason),
}

#[derive(Debug)]
enum SkipReason {
    ReminderLookup(String),
    Composition(String),
    ReminderInsert(String),
}

struct CartGroup {
    user: User,
    views: Vec<ViewEvent>,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ScanAbandonedCartsUseCase {
    type Response = TickSummary;
    type Error = UseCaseError;

    const NAME: &'static str = "ScanAbandonedCarts";

    async fn execute(&mut self, ctx: &NudgeContext) -> Result<Self::Response, Self::Error> {
        if ctx.scanner_lock.swap(true, Ordering::SeqCst) {
            return Err(UseCaseError::TickInProgress);
        }

        let res = run_tick(ctx).await;
        ctx.scanner_lock.store(false, Ordering::SeqCst);
        res
    }
}

async fn run_tick(ctx: &NudgeContext) -> Result<TickSummary, UseCaseError> {
    let now = ctx.sys.get_timestamp_millis();
    let detection_cutoff = now - ctx.config.detection_window_minutes * 60 * 1000;
    let cooldown_cutoff = now - ctx.config.cooldown_minutes * 60 * 1000;

    let views = ctx
        .repos
        .view_events
        .find_since(detection_cutoff)
        .await
        .map_err(|e| UseCaseError::EventFetch(e.to_string()))?;

    let groups = group_by_user(views, ctx).await?;

    let mut summary = TickSummary::default();
    summary.users_scanned = groups.len();

    for (i, group) in groups.iter().enumerate() {
        match process_user(group, now, cooldown_cutoff, ctx).await {
            UserOutcome::Reminded => {
                summary.users_processed += 1;
                summary.messages_recorded += 1;
            }
            UserOutcome::InCooldown => summary.skipped_cooldown += 1,
            UserOutcome::Skipped(reason) => {
                warn!("Skipping user {}: {:?}", group.user.id, reason);
                summary.skipped_error += 1;
            }
        }

        // Pace the upstream APIs between users
        if ctx.config.pacing_delay_millis > 0 && i + 1 < groups.len() {
            sleep(Duration::from_millis(ctx.config.pacing_delay_millis)).await;
        }
    }

    info!(
        "Abandoned cart tick done. users_scanned: {}, skipped_cooldown: {}, skipped_error: {}, users_processed: {}, messages_recorded: {}",
        summary.users_scanned,
        summary.skipped_cooldown,
        summary.skipped_error,
        summary.users_processed,
        summary.messages_recorded
    );

    Ok(summary)
}

/// Groups qualifying views by user, in the order users first appear in the
/// event batch. Views without a resolvable user are dropped: a reminder
/// requires a deliverable address.
async fn group_by_user(
    views: Vec<ViewEvent>,
    ctx: &NudgeContext,
) -> Result<Vec<CartGroup>, UseCaseError> {
    let mut user_ids: Vec<ID> = Vec::new();
    for view in &views {
        if let Some(user_id) = &view.user_id {
            if !user_ids.contains(user_id) {
                user_ids.push(user_id.clone());
            }
        }
    }

    // User resolution is part of the initial batch: failing here aborts the
    // tick just like the event fetch itself.
    let users: HashMap<ID, User> = ctx
        .repos
        .users
        .find_many(&user_ids)
        .await
        .map_err(|e| UseCaseError::EventFetch(e.to_string()))?
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();

    let mut groups: Vec<CartGroup> = Vec::new();
    let mut index: HashMap<ID, usize> = HashMap::new();
    for view in views {
        let user_id = match &view.user_id {
            Some(user_id) => user_id.clone(),
            None => continue,
        };
        let user = match users.get(&user_id) {
            Some(user) => user,
            None => continue,
        };
        match index.get(&user_id) {
            Some(&i) => groups[i].views.push(view),
            None => {
                index.insert(user_id, groups.len());
                groups.push(CartGroup {
                    user: user.clone(),
                    views: vec![view],
                });
            }
        }
    }

    Ok(groups)
}

async fn process_user(
    group: &CartGroup,
    now: i64,
    cooldown_cutoff: i64,
    ctx: &NudgeContext,
) -> UserOutcome {
    let user = &group.user;

    let recent = match ctx
        .repos
        .reminder_messages
        .find_for_user_since(&user.id, ChannelKind::Sms, cooldown_cutoff)
        .await
    {
        Ok(recent) => recent,
        Err(e) => return UserOutcome::Skipped(SkipReason::ReminderLookup(e.to_string())),
    };
    if !recent.is_empty() {
        return UserOutcome::InCooldown;
    }

    let oldest_view = group.views.iter().map(|v| v.viewed_at).min().unwrap_or(now);
    let urgency = Urgency::from_elapsed_millis(now - oldest_view);

    let (product_ids, product_names) = distinct_viewed_products(&group.views);
    let link = match checkout_link(&ctx.config.checkout_base_url, &user.id, &product_ids) {
        Ok(link) => Some(link),
        Err(e) => {
            warn!(
                "Could not build a checkout link for user {}: {:?}",
                user.id, e
            );
            None
        }
    };

    let compose_req = ComposeRequest {
        recipient_name: user.recipient_name().to_string(),
        product_text: product_names.join(", "),
        urgency,
        checkout_link: link,
    };
    let text = match ctx.composer.compose(&compose_req).await {
        Ok(text) => text,
        Err(e) => return UserOutcome::Skipped(SkipReason::Composition(e.to_string())),
    };

    deliver(user, &text, ctx).await;

    // Recording the message is what arms the cooldown for the next tick
    let message = ReminderMessage::new(user.id.clone(), ChannelKind::Sms, text, now);
    if let Err(e) = ctx.repos.reminder_messages.insert(&message).await {
        return UserOutcome::Skipped(SkipReason::ReminderInsert(e.to_string()));
    }

    UserOutcome::Reminded
}

/// Delivery failures do not block the reminder record: the send counts as
/// attempted either way.
async fn deliver(user: &User, text: &str, ctx: &NudgeContext) {
    if ctx.config.dry_run {
        info!("Dry-run: would send SMS to user {}: {}", user.id, text);
        return;
    }

    let phone = match &user.phone {
        Some(phone) => phone,
        None => {
            warn!(
                "User {} has no phone number on record. Skipping delivery.",
                user.id
            );
            return;
        }
    };

    match ctx.sms.send(phone, text).await {
        Ok(receipt) => info!("SMS dispatched to user {}. Receipt: {}", user.id, receipt.sid),
        Err(e) => warn!("SMS delivery to user {} failed: {}", user.id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use nudge_infra::{
        setup_context_inmemory, ComposerError, DeliveryError, DeliveryReceipt, IMessageComposer,
        ISmsSender, ISys,
    };
    use std::sync::{Arc, Mutex};

    const MINUTE: i64 = 60 * 1000;
    const BASE_TS: i64 = 1613862000000;

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    /// Composer failing for one specific recipient, succeeding otherwise
    struct SelectiveFailComposer {
        fail_for: String,
    }

    #[async_trait::async_trait]
    impl IMessageComposer for SelectiveFailComposer {
        async fn compose(&self, req: &ComposeRequest) -> Result<String, ComposerError> {
            if req.recipient_name == self.fail_for {
                Err(ComposerError::Generation("upstream unavailable".into()))
            } else {
                Ok(format!("Hi {}!", req.recipient_name))
            }
        }
    }

    struct RecordingSms {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait::async_trait]
    impl ISmsSender for RecordingSms {
        async fn send(&self, to: &str, body: &str) -> Result<DeliveryReceipt, DeliveryError> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), body.to_string()));
            Ok(DeliveryReceipt { sid: "SM123".into() })
        }
    }

    struct FailingSms;

    #[async_trait::async_trait]
    impl ISmsSender for FailingSms {
        async fn send(&self, _to: &str, _body: &str) -> Result<DeliveryReceipt, DeliveryError> {
            Err(DeliveryError("carrier rejected the message".into()))
        }
    }

    fn ctx_at(now: i64) -> NudgeContext {
        let mut ctx = setup_context_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(now));
        ctx
    }

    async fn insert_user(ctx: &NudgeContext, email: &str, phone: Option<&str>) -> User {
        let mut user = User::new(email);
        user.phone = phone.map(|p| p.to_string());
        ctx.repos.users.insert(&user).await.expect("To insert user");
        user
    }

    async fn insert_view(
        ctx: &NudgeContext,
        user_id: Option<ID>,
        product_id: &str,
        product_name: &str,
        viewed_at: i64,
    ) {
        let view = ViewEvent::new(user_id, product_id.into(), product_name.into(), viewed_at);
        ctx.repos
            .view_events
            .insert(&view)
            .await
            .expect("To insert view");
    }

    async fn reminders_for(ctx: &NudgeContext, user_id: &ID) -> Vec<ReminderMessage> {
        ctx.repos
            .reminder_messages
            .find_for_user_since(user_id, ChannelKind::Sms, 0)
            .await
            .expect("To fetch reminders")
    }

    #[actix_web::main]
    #[test]
    async fn reminds_a_user_with_multiple_viewed_products() {
        // Views 25 and 23 minutes old, well within the default 30 minute
        // window and old enough for the high urgency tier
        let now = BASE_TS + 25 * MINUTE;
        let ctx = ctx_at(now);

        let user = insert_user(&ctx, "a@x.com", None).await;
        insert_view(&ctx, Some(user.id.clone()), "p1", "Widget", BASE_TS).await;
        insert_view(
            &ctx,
            Some(user.id.clone()),
            "p2",
            "Gadget",
            BASE_TS + 2 * MINUTE,
        )
        .await;

        let summary = execute(ScanAbandonedCartsUseCase, &ctx)
            .await
            .expect("Tick to run");
        assert_eq!(summary.users_scanned, 1);
        assert_eq!(summary.users_processed, 1);
        assert_eq!(summary.messages_recorded, 1);
        assert_eq!(summary.skipped_cooldown, 0);
        assert_eq!(summary.skipped_error, 0);

        let reminders = reminders_for(&ctx, &user.id).await;
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].sent_at, now);
        // The template composer references both products in encounter order
        assert!(reminders[0].content.contains("Widget, Gadget"));
        // High urgency at 25 minutes
        assert!(reminders[0].content.contains("Last chance"));
        // The checkout link embeds both product ids and the user
        assert!(reminders[0].content.contains("products=p1%2Cp2"));
        assert!(reminders[0]
            .content
            .contains(&format!("user={}", user.id)));
    }

    #[actix_web::main]
    #[test]
    async fn cooldown_skips_recently_reminded_users() {
        let now = BASE_TS + 30 * MINUTE;
        let ctx = ctx_at(now);

        let user = insert_user(&ctx, "a@x.com", None).await;
        insert_view(
            &ctx,
            Some(user.id.clone()),
            "p1",
            "Widget",
            now - 10 * MINUTE,
        )
        .await;
        // Reminded 5 minutes ago, cooldown window is 30 minutes
        ctx.repos
            .reminder_messages
            .insert(&ReminderMessage::new(
                user.id.clone(),
                ChannelKind::Sms,
                "come back".into(),
                now - 5 * MINUTE,
            ))
            .await
            .expect("To insert reminder");

        let summary = execute(ScanAbandonedCartsUseCase, &ctx)
            .await
            .expect("Tick to run");
        assert_eq!(summary.users_scanned, 1);
        assert_eq!(summary.skipped_cooldown, 1);
        assert_eq!(summary.messages_recorded, 0);
        assert_eq!(reminders_for(&ctx, &user.id).await.len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn expired_cooldown_makes_the_user_eligible_again() {
        let now = BASE_TS + 60 * MINUTE;
        let ctx = ctx_at(now);

        let user = insert_user(&ctx, "a@x.com", None).await;
        insert_view(
            &ctx,
            Some(user.id.clone()),
            "p1",
            "Widget",
            now - 10 * MINUTE,
        )
        .await;
        // The previous reminder is 31 minutes old, outside the 30 minute
        // cooldown window
        ctx.repos
            .reminder_messages
            .insert(&ReminderMessage::new(
                user.id.clone(),
                ChannelKind::Sms,
                "come back".into(),
                now - 31 * MINUTE,
            ))
            .await
            .expect("To insert reminder");

        let summary = execute(ScanAbandonedCartsUseCase, &ctx)
            .await
            .expect("Tick to run");
        assert_eq!(summary.users_processed, 1);
        assert_eq!(reminders_for(&ctx, &user.id).await.len(), 2);
    }

    #[actix_web::main]
    #[test]
    async fn reminders_on_other_channels_do_not_arm_the_cooldown() {
        let now = BASE_TS + 30 * MINUTE;
        let ctx = ctx_at(now);

        let user = insert_user(&ctx, "a@x.com", None).await;
        insert_view(
            &ctx,
            Some(user.id.clone()),
            "p1",
            "Widget",
            now - 10 * MINUTE,
        )
        .await;
        ctx.repos
            .reminder_messages
            .insert(&ReminderMessage::new(
                user.id.clone(),
                ChannelKind::Email,
                "come back".into(),
                now - 5 * MINUTE,
            ))
            .await
            .expect("To insert reminder");

        let summary = execute(ScanAbandonedCartsUseCase, &ctx)
            .await
            .expect("Tick to run");
        assert_eq!(summary.users_processed, 1);
        assert_eq!(summary.skipped_cooldown, 0);
    }

    #[actix_web::main]
    #[test]
    async fn anonymous_views_never_produce_reminders() {
        let now = BASE_TS + 25 * MINUTE;
        let ctx = ctx_at(now);

        insert_view(&ctx, None, "p1", "Widget", BASE_TS).await;

        let summary = execute(ScanAbandonedCartsUseCase, &ctx)
            .await
            .expect("Tick to run");
        assert_eq!(summary.users_scanned, 0);
        assert_eq!(summary.messages_recorded, 0);
    }

    #[actix_web::main]
    #[test]
    async fn stale_views_outside_the_window_are_ignored() {
        let now = BASE_TS + 40 * MINUTE;
        let ctx = ctx_at(now);

        let user = insert_user(&ctx, "a@x.com", None).await;
        // 40 minutes old, outside the 30 minute detection window
        insert_view(&ctx, Some(user.id.clone()), "p1", "Widget", BASE_TS).await;

        let summary = execute(ScanAbandonedCartsUseCase, &ctx)
            .await
            .expect("Tick to run");
        assert_eq!(summary.users_scanned, 0);
        assert!(reminders_for(&ctx, &user.id).await.is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn a_composer_failure_is_isolated_to_its_user() {
        let now = BASE_TS + 10 * MINUTE;
        let mut ctx = ctx_at(now);
        ctx.composer = Arc::new(SelectiveFailComposer {
            fail_for: "b".into(),
        });

        let a = insert_user(&ctx, "a@x.com", None).await;
        let b = insert_user(&ctx, "b@x.com", None).await;
        let c = insert_user(&ctx, "c@x.com", None).await;
        for user in [&a, &b, &c].iter() {
            insert_view(
                &ctx,
                Some(user.id.clone()),
                "p1",
                "Widget",
                now - 5 * MINUTE,
            )
            .await;
        }

        let summary = execute(ScanAbandonedCartsUseCase, &ctx)
            .await
            .expect("Tick to run");
        assert_eq!(summary.users_scanned, 3);
        assert_eq!(summary.users_processed, 2);
        assert_eq!(summary.skipped_error, 1);
        assert_eq!(summary.messages_recorded, 2);

        assert_eq!(reminders_for(&ctx, &a.id).await.len(), 1);
        assert!(reminders_for(&ctx, &b.id).await.is_empty());
        assert_eq!(reminders_for(&ctx, &c.id).await.len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn production_mode_delivers_to_the_users_phone() {
        let now = BASE_TS + 10 * MINUTE;
        let mut ctx = ctx_at(now);
        ctx.config.dry_run = false;
        let sms = Arc::new(RecordingSms {
            sent: Mutex::new(vec![]),
        });
        ctx.sms = sms.clone();

        let with_phone = insert_user(&ctx, "a@x.com", Some("+15551234567")).await;
        let without_phone = insert_user(&ctx, "b@x.com", None).await;
        insert_view(
            &ctx,
            Some(with_phone.id.clone()),
            "p1",
            "Widget",
            now - 5 * MINUTE,
        )
        .await;
        insert_view(
            &ctx,
            Some(without_phone.id.clone()),
            "p2",
            "Gadget",
            now - 5 * MINUTE,
        )
        .await;

        let summary = execute(ScanAbandonedCartsUseCase, &ctx)
            .await
            .expect("Tick to run");
        assert_eq!(summary.users_processed, 2);

        let sent = sms.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "+15551234567");
        // The missing phone did not block the reminder record
        drop(sent);
        assert_eq!(reminders_for(&ctx, &without_phone.id).await.len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn a_delivery_failure_still_records_the_reminder() {
        let now = BASE_TS + 10 * MINUTE;
        let mut ctx = ctx_at(now);
        ctx.config.dry_run = false;
        ctx.sms = Arc::new(FailingSms);

        let user = insert_user(&ctx, "a@x.com", Some("+15551234567")).await;
        insert_view(
            &ctx,
            Some(user.id.clone()),
            "p1",
            "Widget",
            now - 5 * MINUTE,
        )
        .await;

        let summary = execute(ScanAbandonedCartsUseCase, &ctx)
            .await
            .expect("Tick to run");
        assert_eq!(summary.users_processed, 1);
        assert_eq!(reminders_for(&ctx, &user.id).await.len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn refuses_overlapping_ticks() {
        let ctx = ctx_at(BASE_TS);
        ctx.scanner_lock
            .store(true, std::sync::atomic::Ordering::SeqCst);

        assert!(matches!(
            execute(ScanAbandonedCartsUseCase, &ctx).await,
            Err(UseCaseError::TickInProgress)
        ));

        // A finished tick releases the lock
        ctx.scanner_lock
            .store(false, std::sync::atomic::Ordering::SeqCst);
        execute(ScanAbandonedCartsUseCase, &ctx)
            .await
            .expect("Tick to run");
        assert!(!ctx.scanner_lock.load(std::sync::atomic::Ordering::SeqCst));
    }
}
