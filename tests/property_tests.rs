//! Property tests for cross-module invariants.

use proptest::prelude::*;
use task_guard::{
    classify, sanitize, Ctx, MemoryAccountStore, MemoryTaskStore, PasswordPolicy, PrincipalGate,
    RegistrationForm, RegistrationGuard, RequestMeta, SaltedSha256Hasher, Surface, Tainted,
    TaskDraft, TaskService,
};

// Strategy: a word with every letter independently upper- or lower-cased
fn any_case(word: &'static str) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<bool>(), word.len()).prop_map(move |upper| {
        word.chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

// Strategy: filler text that contains no rule on its own
fn filler() -> impl Strategy<Value = String> {
    prop::string::string_regex("[b-hk-mq-z0-9 ]{0,12}").unwrap()
}

fn owners() -> [&'static str; 4] {
    ["alice", "bob", "carol", "dave"]
}

fn register_owners(accounts: &MemoryAccountStore) {
    let guard = RegistrationGuard::new(accounts, &SaltedSha256Hasher);
    let policy = PasswordPolicy::default();
    for name in owners() {
        let ctx = PrincipalGate::new(RequestMeta::new("req-setup", "/signup", Surface::Page)).anonymous();
        let form = RegistrationForm {
            username: Some(name.to_string()),
            email: Some(format!("{name}@example.com")),
            password: Some("ValidP@ss123".to_string()),
        };
        guard.register(&ctx, form.bind(&policy).unwrap()).unwrap();
    }
}

fn ctx_for(accounts: &MemoryAccountStore, name: &str) -> Ctx {
    let meta = RequestMeta::new("req-prop", "/api/tasks", Surface::Api).with_username(name);
    PrincipalGate::new(meta).authenticate(accounts).unwrap()
}

proptest! {
    /// SQL rules match anywhere, in any case.
    #[test]
    fn proptest_sql_rules_match_anywhere(
        prefix in filler(),
        suffix in filler(),
        marker in prop_oneof![any_case("select"), any_case("drop table"), Just("--".to_string()), Just(";".to_string())],
    ) {
        let input = format!("{prefix}{marker}{suffix}");
        prop_assert!(classify(Some(&input)).sql_injection);
    }

    /// Script rules match anywhere, in any case.
    #[test]
    fn proptest_script_rules_match_anywhere(
        prefix in filler(),
        suffix in filler(),
        marker in prop_oneof![any_case("<script"), any_case("javascript:"), any_case("onerror")],
    ) {
        let input = format!("{prefix}{marker}{suffix}");
        prop_assert!(classify(Some(&input)).script_injection);
    }

    /// Sanitizing twice changes nothing.
    #[test]
    fn proptest_sanitize_is_idempotent(raw in any::<String>()) {
        let once = sanitize(Some(&raw));
        let twice = sanitize(once.as_deref());
        prop_assert_eq!(once, twice);
    }

    /// Sanitized output never carries stripped control characters.
    #[test]
    fn proptest_sanitize_strips_controls(raw in any::<String>()) {
        let cleaned = sanitize(Some(&raw)).unwrap_or_default();
        prop_assert!(cleaned
            .chars()
            .all(|c| !c.is_ascii_control() || matches!(c, '\r' | '\n' | '\t')));
    }

    /// Script-free passwords of valid length pass, SQL-looking ones included.
    #[test]
    fn proptest_password_policy_accepts_script_free(
        password in prop::string::string_regex("[A-Za-z0-9'\";=@!-]{3,128}").unwrap(),
    ) {
        prop_assume!(!classify(Some(&password)).script_injection);
        prop_assume!(!password.trim().is_empty());
        prop_assert!(PasswordPolicy::default().check(Some(&password)).is_ok());
    }

    /// Listing never returns another owner's task, however creations interleave.
    #[test]
    fn proptest_list_isolation_across_interleaved_owners(
        creations in proptest::collection::vec((0usize..4, "[a-z]{1,12}"), 0..40),
    ) {
        let accounts = MemoryAccountStore::new();
        register_owners(&accounts);
        let tasks = MemoryTaskStore::new();
        let service = TaskService::new(&tasks);

        let mut expected = vec![Vec::new(); 4];
        for (owner, short) in &creations {
            let ctx = ctx_for(&accounts, owners()[*owner]);
            let draft = TaskDraft {
                short_description: Some(short.clone()),
                ..TaskDraft::default()
            };
            let view = service.create(&ctx, Tainted::new(draft)).unwrap();
            expected[*owner].push(view.id);
        }

        for (index, name) in owners().iter().enumerate() {
            let ctx = ctx_for(&accounts, name);
            let listed: Vec<_> = service.list(&ctx).unwrap().into_iter().map(|v| v.id).collect();
            let mut newest_first = expected[index].clone();
            newest_first.reverse();
            prop_assert_eq!(listed, newest_first);
        }
    }
}
