//! BDD steps for the message gateway over the in-memory store.

use std::sync::Arc;

use courier::message::{
    adapters::memory::InMemoryMessageStore,
    domain::{ClearOr, CreateMessageParams, MessageId, Role, Translation},
    services::MessageGateway,
};
use eyre::{WrapErr, eyre};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Default)]
struct GatewayWorld {
    gateway: Option<MessageGateway<InMemoryMessageStore>>,
    last_message: Option<MessageId>,
}

#[fixture]
fn world() -> GatewayWorld {
    GatewayWorld::default()
}

fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

impl GatewayWorld {
    fn gateway(&self) -> Result<&MessageGateway<InMemoryMessageStore>, eyre::Report> {
        self.gateway
            .as_ref()
            .ok_or_else(|| eyre!("gateway not initialised"))
    }

    fn post_many(&self, count: usize) -> Result<(), eyre::Report> {
        let gateway = self.gateway()?;
        for n in 0..count {
            let params =
                CreateMessageParams::new(Role::User, format!("message {n}")).with_session("sess-1");
            run_async(gateway.create_message(params)).wrap_err("create should succeed")?;
        }
        Ok(())
    }

    fn trace_check(&self) -> Result<bool, eyre::Report> {
        run_async(self.gateway()?.message_count_to_check_trace())
            .wrap_err("count should succeed")
    }
}

#[given("an empty message store behind the gateway")]
fn empty_store(world: &mut GatewayWorld) {
    *world = GatewayWorld {
        gateway: Some(MessageGateway::new(Arc::new(InMemoryMessageStore::default()))),
        last_message: None,
    };
}

#[when("a user posts a greeting to the inbox session")]
fn post_to_inbox(world: &mut GatewayWorld) -> Result<(), eyre::Report> {
    let params = CreateMessageParams::new(Role::User, "hi").with_session("inbox");
    let id = run_async(world.gateway()?.create_message(params)).wrap_err("create should succeed")?;
    world.last_message = Some(id);
    Ok(())
}

#[when("a translated message is posted and its translation is cleared")]
fn translate_then_clear(world: &mut GatewayWorld) -> Result<(), eyre::Report> {
    let gateway = world.gateway()?;
    let params = CreateMessageParams::new(Role::Assistant, "hello").with_session("sess-1");
    let id = run_async(gateway.create_message(params)).wrap_err("create should succeed")?;

    let translation = Translation {
        to: Some("de".to_owned()),
        content: Some("hallo".to_owned()),
        ..Translation::default()
    };
    run_async(gateway.update_message_translate(id.clone(), translation.into()))
        .wrap_err("translate should succeed")?;
    run_async(gateway.update_message_translate(id.clone(), ClearOr::Clear))
        .wrap_err("clear should succeed")?;

    world.last_message = Some(id);
    Ok(())
}

#[when("three messages are posted")]
fn post_three(world: &mut GatewayWorld) -> Result<(), eyre::Report> {
    world.post_many(3)
}

#[when("four messages are posted")]
fn post_four(world: &mut GatewayWorld) -> Result<(), eyre::Report> {
    world.post_many(4)
}

#[then("the store holds one message without a session")]
fn one_sessionless_message(world: &GatewayWorld) -> Result<(), eyre::Report> {
    let messages =
        run_async(world.gateway()?.get_all_messages()).wrap_err("query should succeed")?;
    let message = messages
        .first()
        .ok_or_else(|| eyre!("expected a stored message"))?;

    assert_eq!(messages.len(), 1);
    assert_eq!(Some(&message.id), world.last_message.as_ref());
    assert!(message.session_id.is_none());
    Ok(())
}

#[then("the message has no translation")]
fn no_translation(world: &GatewayWorld) -> Result<(), eyre::Report> {
    let id = world
        .last_message
        .as_ref()
        .ok_or_else(|| eyre!("expected a posted message"))?;
    let message = world
        .gateway()?
        .client()
        .find(id)
        .wrap_err("lookup should succeed")?
        .ok_or_else(|| eyre!("expected message {id} to exist"))?;

    assert!(message.translate.is_none());
    Ok(())
}

#[then("the trace check is not due")]
fn trace_not_due(world: &GatewayWorld) -> Result<(), eyre::Report> {
    assert!(!world.trace_check()?);
    Ok(())
}

#[then("the trace check is due")]
fn trace_due(world: &GatewayWorld) -> Result<(), eyre::Report> {
    assert!(world.trace_check()?);
    Ok(())
}

#[scenario(
    path = "tests/features/message_gateway.feature",
    name = "Posting to the inbox stores a session-less message"
)]
#[tokio::test(flavor = "multi_thread")]
async fn inbox_post(world: GatewayWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/message_gateway.feature",
    name = "Clearing a translation removes it"
)]
#[tokio::test(flavor = "multi_thread")]
async fn translation_clear(world: GatewayWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/message_gateway.feature",
    name = "Trace check is not due below four messages"
)]
#[tokio::test(flavor = "multi_thread")]
async fn trace_below_threshold(world: GatewayWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/message_gateway.feature",
    name = "Trace check is due at four messages"
)]
#[tokio::test(flavor = "multi_thread")]
async fn trace_at_threshold(world: GatewayWorld) {
    let _ = world;
}
