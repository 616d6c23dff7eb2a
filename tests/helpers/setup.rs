use nudge_api::Application;
use nudge_infra::{setup_context_inmemory, NudgeContext};

pub struct TestApp {
    /// Handle onto the spawned application's context, for seeding records
    /// and inspecting what a request persisted
    pub ctx: NudgeContext,
    pub address: String,
}

// Launch the application as a background task
pub async fn spawn_app() -> TestApp {
    let mut ctx = setup_context_inmemory();
    ctx.config.port = 0; // Random port

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    TestApp { ctx, address }
}
