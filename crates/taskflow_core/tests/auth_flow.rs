use taskflow_core::auth::submit_label;
use taskflow_core::{
    validate_form, AppStore, AuthError, AuthForm, AuthMode, InMemoryIdentityProvider, Locale,
    LoginController, Message, NoticeLevel, NoticeLog, Route, Router, SubmitOutcome,
};

#[test]
fn register_with_mismatched_confirmation_never_reaches_provider() {
    let provider = InMemoryIdentityProvider::new();
    let mut router = Router::default();
    let mut notices = NoticeLog::new();
    let mut controller = LoginController::new(&provider, &mut router, &mut notices, Locale::En);
    controller.set_mode(AuthMode::Register);

    let outcome = controller.submit(&AuthForm::register("a@b.c", "x", "y"));

    assert_eq!(outcome, SubmitOutcome::Failed(AuthError::PasswordMismatch));
    assert!(!controller.is_loading());
    drop(controller);

    assert_eq!(provider.call_count(), 0);
    let drained = notices.drain();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].level, NoticeLevel::Error);
    assert_eq!(drained[0].message, "passwords do not match");
    assert_eq!(router.current(), Route::Login);
}

#[test]
fn sign_up_then_confirm_then_sign_in_reaches_dashboard() {
    let provider = InMemoryIdentityProvider::requiring_confirmation();
    let mut router = Router::default();
    let mut notices = NoticeLog::new();
    let mut controller = LoginController::new(&provider, &mut router, &mut notices, Locale::Fr);

    controller.set_mode(AuthMode::Register);
    let signed_up = controller.submit(&AuthForm::register(
        " grace@example.com ",
        "hopper42",
        "hopper42",
    ));
    assert!(signed_up.is_success());

    controller.set_mode(AuthMode::Login);
    let blocked = controller.submit(&AuthForm::login("grace@example.com", "hopper42"));
    assert!(matches!(
        blocked,
        SubmitOutcome::Failed(AuthError::Provider { ref code, .. })
            if code.as_deref() == Some("email_not_confirmed")
    ));

    assert!(provider.confirm_email("grace@example.com"));
    let outcome = controller.submit(&AuthForm::login("grace@example.com", "hopper42"));
    drop(controller);

    let user = match outcome {
        SubmitOutcome::SignedIn(user) => user,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(user.email, "grace@example.com");
    assert_eq!(router.history(), &[Route::Login, Route::Dashboard]);

    let levels: Vec<NoticeLevel> = notices.iter().map(|n| n.level).collect();
    assert_eq!(
        levels,
        vec![NoticeLevel::Success, NoticeLevel::Error, NoticeLevel::Success]
    );
    assert_eq!(provider.call_count(), 3);
}

#[test]
fn embedding_records_signed_in_user_in_store() {
    let provider = InMemoryIdentityProvider::new().with_account("ada@example.com", "secret1");
    let mut store = AppStore::new();
    let mut controller =
        LoginController::new(provider, Router::default(), NoticeLog::new(), Locale::Fr);

    let revision = store.revision();
    if let SubmitOutcome::SignedIn(user) =
        controller.submit(&AuthForm::login("ada@example.com", "secret1"))
    {
        assert_eq!(store.revision(), revision);
        store.set_current_user(Some(user));
    }

    assert_eq!(
        store.current_user().map(|u| u.email.as_str()),
        Some("ada@example.com")
    );
    assert_eq!(controller.navigator().current_path(), "/dashboard");
}

#[test]
fn validation_checks_run_in_field_order() {
    assert_eq!(
        validate_form(AuthMode::Login, &AuthForm::login("  ", "")),
        Err(AuthError::EmailRequired)
    );
    assert_eq!(
        validate_form(AuthMode::Login, &AuthForm::login("not-an-email", "")),
        Err(AuthError::EmailInvalid)
    );
    assert_eq!(
        validate_form(AuthMode::Login, &AuthForm::login("a@b.c", "")),
        Err(AuthError::PasswordRequired)
    );

    let credentials = validate_form(AuthMode::Login, &AuthForm::login(" a@b.c ", "pw"))
        .expect("valid login form");
    assert_eq!(credentials.email, "a@b.c");
}

#[test]
fn login_mode_ignores_confirmation_field() {
    let form = AuthForm::register("a@b.c", "secret1", "other");
    assert!(validate_form(AuthMode::Login, &form).is_ok());
    assert_eq!(
        validate_form(AuthMode::Register, &form),
        Err(AuthError::PasswordMismatch)
    );
}

#[test]
fn submit_captions_are_localized() {
    assert_eq!(
        submit_label(AuthMode::Register, false).text(Locale::Fr),
        "S'inscrire"
    );
    assert_eq!(
        submit_label(AuthMode::Login, true).text(Locale::En),
        Message::LoginSubmitting.text(Locale::En)
    );
}
