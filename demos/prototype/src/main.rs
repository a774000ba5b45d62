use std::sync::Arc;

use patchbay_boot::{plug_with, Boot};
use patchbay_di::{hosted, BoundArgs, CallArgs, Host, Managed, Param, Signature};

use crate::store::{DynStore, InStoreSession, MemoryStore, User};

mod store;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let boot = Boot::new(vec![plug_with(|| -> DynStore {
        Arc::new(MemoryStore::with_sample_users())
    })
    .into(Host::new())
    .lazy()])
    .unwrap();
    tracing::info!("Root pair ready: {:?}", boot.registry());

    // A lookup function whose store parameter is supplied by the runtime
    let signature = Signature::of("get_user")
        .param(Param::required("id"))
        .param(Param::hosted::<DynStore>("store", hosted()));
    let mut get_user = Managed::new(
        boot.router().manage(signature).unwrap(),
        |args: &BoundArgs| -> Option<User> {
            let id = args.get::<String>("id")?;
            let store = args.get::<DynStore>("store")?;
            store.fetch(&id)
        },
    );

    let user = get_user
        .call(CallArgs::new().positional("user1".to_string()))
        .unwrap()
        .expect("sample user is in the store");
    println!("fetched {} (strength {})", user.name, user.strength);

    // A session built around the resolved store
    let signature = Signature::of("InStoreSession")
        .param(Param::hosted::<DynStore>("store", hosted()));
    let mut make_session = Managed::new(
        boot.router().manage(signature).unwrap(),
        |args: &BoundArgs| {
            let store = args.get::<DynStore>("store").expect("store is hosted");
            InStoreSession::new(store.as_ref().clone())
        },
    );

    let session = make_session.call(CallArgs::new()).unwrap();
    println!("session data: {}", session.get_data("user1"));
}
