use std::sync::Arc;

use stardust_core::inmem::{MemFolder, MemFunction, MemLink, MemString};
use stardust_core::{Describe, EntryRef, Namespace};

fn string(name: &str, value: &str) -> EntryRef {
    Arc::new(MemString::new(name, value))
}

#[test]
fn mount_put_get_and_walk_into_string() {
    let ns = Namespace::with_standard_root("stardust://");
    let ctx = ns.context();

    assert!(ctx.put("/n/test", Some(Arc::new(MemFolder::new("test")))));
    assert!(ctx.put("/n/test/greeting", Some(string("greeting", "hi"))));

    let greeting = ctx.get_string("/n/test/greeting").expect("greeting");
    assert_eq!(greeting.get(), "hi");

    let mut handle = ns.new_handle();
    assert!(!handle.walk("/n/test/greeting/nope"));
    assert_eq!(handle.path(), "/n/test/greeting");
    assert_eq!(handle.uri(), "stardust:///n/test/greeting");
}

#[test]
fn mounted_subtree_is_transparent() {
    let ns = Namespace::with_standard_root("stardust://");
    let ctx = ns.context();

    // Built privately, then grafted in with a single put.
    let driver = MemFolder::new_of(
        "kv",
        [
            Arc::new(MemFolder::new_of("config", [string("region", "eu")])) as EntryRef,
            string("status", "ready"),
        ],
    );
    assert!(ctx.put("/n/kv", Some(Arc::new(driver))));

    assert_eq!(
        ctx.get_string("/n/kv/config/region").map(|s| s.get()).as_deref(),
        Some("eu")
    );
    let mut handle = ns.new_handle();
    assert!(handle.walk("/n/kv/config"));
    assert!(handle.walk("../status"));
    assert_eq!(handle.path(), "/n/kv/status");

    assert!(ctx.put("/n/kv", None));
    assert!(ctx.get("/n/kv/status").is_none());
}

#[test]
fn frozen_mounts_refuse_writes() {
    let ns = Namespace::with_standard_root("stardust://");
    let ctx = ns.context();
    let rom = MemFolder::new_of("rom", [string("motd", "welcome")]).frozen();
    assert!(ctx.put("/n/rom", Some(Arc::new(rom))));

    assert!(!ctx.put("/n/rom/motd", Some(string("motd", "changed"))));
    assert!(!ctx.put("/n/rom/motd", None));
    assert!(!ctx.put("/n/rom/extra", Some(string("extra", "x"))));
    let rom = ctx.get_folder("/n/rom").expect("rom");
    assert_eq!(rom.children(), vec!["motd".to_string()]);
    assert_eq!(
        ctx.get_string("/n/rom/motd").map(|s| s.get()).as_deref(),
        Some("welcome")
    );
}

#[test]
fn links_stay_opaque_until_resolved() {
    let ns = Namespace::with_standard_root("stardust://");
    let ctx = ns.context();
    assert!(ctx.put("/tmp/later", Some(Arc::new(MemLink::new("later", "/n/not-yet")))));

    // Walking onto a link yields the link itself, not its target.
    let link = ctx.get_link("/tmp/later").expect("link");
    assert_eq!(link.target(), "/n/not-yet");
    assert!(ctx.get(&link.target()).is_none());

    assert!(ctx.put("/n/not-yet", Some(string("not-yet", "here"))));
    assert!(ctx.get(&link.target()).is_some());
}

#[tokio::test]
async fn functions_mount_what_they_build() {
    let ns = Namespace::with_standard_root("stardust://");
    let ctx = ns.context();

    let mount = MemFunction::new("mount-scratch", |ctx, input| {
        let name = input.and_then(|e| e.into_string())?.get();
        let path = format!("/n/{name}");
        ctx.put(&path, Some(Arc::new(MemFolder::new(name.as_str()))))
            .then(|| ctx.get(&path))
            .flatten()
    });
    assert!(ctx.put("/tmp/mount", Some(Arc::new(mount))));

    let made = ctx
        .invoke("/tmp/mount", Some(string("name", "scratch")))
        .await
        .expect("mounted folder");
    assert_eq!(format!("{}", Describe(Some(&made))), "scratch [Folder]");
    assert!(ctx.get_folder("/n/scratch").is_some());
}
