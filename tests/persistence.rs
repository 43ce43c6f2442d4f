//! End-to-end behavior of the persistence store and accounts over shared storage.

use std::cell::RefCell;
use std::rc::Rc;

use cinevault::core::{
    AccountService, Change, PersistenceStore, Registration, SessionProvider, Topic, listener,
};
use cinevault::models::{MediaItem, MediaKind, Score};
use cinevault::utils::{KeyValueStore, ManualClock, MemoryStorage};

struct App {
    storage: MemoryStorage,
    clock: ManualClock,
    accounts: Rc<AccountService>,
    store: PersistenceStore,
}

fn app() -> App {
    let storage = MemoryStorage::new();
    let clock = ManualClock::new(1_700_000_000_000);
    let accounts = Rc::new(AccountService::new(
        Rc::new(storage.clone()),
        Rc::new(clock.clone()),
    ));
    let store = PersistenceStore::new(
        Rc::new(storage.clone()),
        Rc::new(clock.clone()),
        accounts.clone(),
    );
    App {
        storage,
        clock,
        accounts,
        store,
    }
}

fn register(accounts: &AccountService, name: &str, email: &str) {
    accounts
        .register(&Registration {
            name: name.into(),
            email: email.into(),
            password: "hunter22".into(),
            confirm: "hunter22".into(),
        })
        .unwrap();
}

#[test]
fn favorite_add_twice_then_remove() {
    let app = app();
    let dune = MediaItem::new(42, MediaKind::Movie, "Dune").with_poster("/dune.jpg");

    assert!(app.store.add_favorite(dune.clone()).unwrap());
    assert_eq!(app.store.favorites().len(), 1);

    assert!(!app.store.add_favorite(dune).unwrap());
    assert_eq!(app.store.favorites().len(), 1);

    app.store.remove_favorite(42, MediaKind::Movie).unwrap();
    assert!(app.store.favorites().is_empty());
}

#[test]
fn stored_json_matches_browser_layout() {
    let app = app();
    app.store
        .add_favorite(MediaItem::new(42, MediaKind::Movie, "Dune"))
        .unwrap();
    app.store
        .rate(7, MediaKind::Series, Score::new(9).unwrap())
        .unwrap();

    let favorites: serde_json::Value =
        serde_json::from_str(&app.storage.get_item("cinevault_favorites").unwrap().unwrap())
            .unwrap();
    assert_eq!(favorites[0]["id"], 42);
    assert_eq!(favorites[0]["type"], "movie");
    assert_eq!(favorites[0]["addedAt"], 1_700_000_000_000u64);

    let ratings: serde_json::Value =
        serde_json::from_str(&app.storage.get_item("cinevault_ratings").unwrap().unwrap())
            .unwrap();
    assert_eq!(ratings["tv_7"]["rating"], 9);
}

#[test]
fn history_stays_bounded_and_most_recent_first() {
    let app = app();
    for id in 0..60 {
        app.store
            .add_to_history(MediaItem::new(id, MediaKind::Movie, "x"))
            .unwrap();
        app.clock.advance(1);
    }
    app.store
        .add_to_history(MediaItem::new(30, MediaKind::Movie, "x"))
        .unwrap();

    let history = app.store.history();
    assert_eq!(history.len(), 50);
    assert_eq!(history[0].item.id, 30);
    assert_eq!(history.iter().filter(|h| h.item.id == 30).count(), 1);
    assert_eq!(history[1].item.id, 59);
}

#[test]
fn reads_survive_a_new_store_instance() {
    let app = app();
    app.store
        .add_to_watchlist(MediaItem::new(1, MediaKind::Series, "Dark"))
        .unwrap();

    let reopened = PersistenceStore::new(
        Rc::new(app.storage.clone()),
        Rc::new(app.clock.clone()),
        app.accounts.clone(),
    );
    assert!(reopened.is_in_watchlist(1, MediaKind::Series));
}

#[test]
fn comment_lifecycle_across_users() {
    let app = app();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    app.store.subscribe(
        Topic::Comments,
        &listener(move |change| {
            if let Change::Comments { comments, .. } = change {
                log.borrow_mut().push(comments.len());
            }
            Ok(())
        }),
    );

    register(&app.accounts, "Ann", "ann@example.com");
    let comment = app
        .store
        .add_comment(42, MediaKind::Movie, "Loved it")
        .unwrap()
        .unwrap();
    assert_eq!(comment.author_name, "Ann");

    app.accounts.logout().unwrap();
    app.clock.advance(1_000);
    register(&app.accounts, "Bob", "bob@example.com");
    let bob = app.accounts.current_user().unwrap();

    assert!(app.store.like_comment(42, MediaKind::Movie, &comment.id).unwrap());
    assert!(app.store.comments(42, MediaKind::Movie)[0].is_liked_by(&bob.id));
    assert!(!app.store.delete_comment(42, MediaKind::Movie, &comment.id).unwrap());

    app.accounts.login("ann@example.com", "hunter22").unwrap();
    assert!(app.store.delete_comment(42, MediaKind::Movie, &comment.id).unwrap());

    assert_eq!(*seen.borrow(), vec![1, 1, 0]);
}

#[test]
fn failing_subscriber_does_not_block_others_or_the_write() {
    let app = app();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);

    app.store
        .subscribe(Topic::Ratings, &listener(|_| Err("render failed".into())));
    app.store.subscribe(
        Topic::Ratings,
        &listener(move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        }),
    );

    app.store
        .rate(1, MediaKind::Movie, Score::new(4).unwrap())
        .unwrap();
    assert_eq!(*calls.borrow(), 1);
    assert_eq!(
        app.store.user_rating(1, MediaKind::Movie),
        Score::new(4)
    );
}

#[test]
fn liking_twice_undoes_the_like() {
    let app = app();
    register(&app.accounts, "Dana", "user.name@mail.example.org");
    let comment = app
        .store
        .add_comment(42, MediaKind::Movie, "Worth a rewatch")
        .unwrap()
        .unwrap();
    let dana = app.accounts.current_user().unwrap();

    assert!(app.store.like_comment(42, MediaKind::Movie, &comment.id).unwrap());
    let liked = &app.store.comments(42, MediaKind::Movie)[0];
    assert_eq!(liked.like_count, 1);
    assert!(liked.is_liked_by(&dana.id));

    assert!(app.store.like_comment(42, MediaKind::Movie, &comment.id).unwrap());
    let unliked = &app.store.comments(42, MediaKind::Movie)[0];
    assert_eq!(unliked.like_count, 0);
    assert!(!unliked.is_liked_by(&dana.id));
}
