use std::sync::Arc;

use beanwire::{ClassDefinition, ClassIdentity, Component, Container, Inject};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("beanwire=debug")),
        )
        .init();

    let container = match Container::new([
        ClassIdentity::of::<UserService>(),
        ClassIdentity::of::<InMemoryUserRepository>(),
        ClassIdentity::of::<OrderService>(),
    ]) {
        Ok(container) => container,
        Err(e) => {
            eprintln!("Failed to build container: {e}");
            std::process::exit(1);
        }
    };

    println!("{:?}", container);
    println!("{}", container.wiring());

    if let Some(service) = container.get_bean::<UserService>() {
        println!("{:?}", service.find_name(1));
    }
    if let Err(e) = container.wiring().check_complete() {
        println!("{e}");
    }
}

trait UserRepository: Send + Sync {
    fn find_name(&self, id: u32) -> Option<String>;
}

#[derive(Default)]
struct InMemoryUserRepository;
impl UserRepository for InMemoryUserRepository {
    fn find_name(&self, id: u32) -> Option<String> {
        (id == 1).then(|| "gugu".to_string())
    }
}
impl Component for InMemoryUserRepository {
    fn definition() -> ClassDefinition<Self> {
        ClassDefinition::<Self>::new()
            .default_constructor()
            .provides::<dyn UserRepository>(|bean| bean as Arc<dyn UserRepository>)
    }
}

#[derive(Default)]
struct UserService {
    repository: Inject<dyn UserRepository>,
}
impl UserService {
    fn find_name(&self, id: u32) -> Option<String> {
        self.repository.get()?.find_name(id)
    }
}
impl Component for UserService {
    fn definition() -> ClassDefinition<Self> {
        ClassDefinition::<Self>::new()
            .default_constructor()
            .field("repository", |service| &service.repository)
    }
}

trait PaymentGateway: Send + Sync {}

// Nothing provides a PaymentGateway, the field stays unset
#[derive(Default)]
struct OrderService {
    gateway: Inject<dyn PaymentGateway>,
}
impl Component for OrderService {
    fn definition() -> ClassDefinition<Self> {
        ClassDefinition::<Self>::new()
            .default_constructor()
            .field("gateway", |service| &service.gateway)
    }
}
