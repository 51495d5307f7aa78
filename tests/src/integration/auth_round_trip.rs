//! # Authentication Round Trip
//!
//! Drives the full login lifecycle through the service entry point:
//! challenge against a property-file credential store, token state checks,
//! end-session, and the reply protocol on the `LoginClient` subject.

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use relay_auth::{PropertyFileValidator, RoleBasedAdapter};
    use relay_bus::{InMemoryMessageBus, MessageSender, SubjectFilter, Subscription};
    use relay_runtime::{MessageService, RelayService};
    use shared_types::{
        Command, Message, PartKey, RoleToken, SessionStore, AUTHORIZATION_SERVICE_SUBJECT,
        LOGIN_CLIENT_SUBJECT,
    };

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    /// Credential file accepting alice/correct, written to a temp path.
    fn credential_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "# relay credentials\nalice={}",
            PropertyFileValidator::digest_hex("correct")
        )
        .expect("write");
        file
    }

    struct Harness {
        service: RelayService,
        sessions: Arc<SessionStore>,
        // Keeps the credential file alive for the validator's lifetime.
        _credentials: tempfile::NamedTempFile,
    }

    fn harness(motd: Option<&str>) -> Harness {
        let credentials = credential_file();
        let validator =
            PropertyFileValidator::from_file(credentials.path()).expect("load credentials");

        let bus = Arc::new(InMemoryMessageBus::new());
        let sessions = SessionStore::new_shared();
        let mut adapter = RoleBasedAdapter::new(
            Arc::clone(&sessions),
            Arc::new(validator),
            Arc::clone(&bus) as Arc<dyn MessageSender>,
        );
        if let Some(motd) = motd {
            adapter = adapter.with_motd(motd);
        }

        Harness {
            service: RelayService::new(bus, Arc::new(adapter)),
            sessions,
            _credentials: credentials,
        }
    }

    fn auth_request(session_id: shared_types::SessionId, name: &str, password: &str) -> Message {
        Message::new(AUTHORIZATION_SERVICE_SUBJECT)
            .with_command(Command::AuthRequest)
            .with_session(session_id)
            .with_str(PartKey::Name, name)
            .with_str(PartKey::Password, password)
    }

    async fn next_reply(sub: &mut Subscription) -> Message {
        timeout(Duration::from_millis(500), sub.recv())
            .await
            .expect("timeout waiting for reply")
            .expect("reply")
    }

    // =========================================================================
    // SCENARIOS
    // =========================================================================

    #[tokio::test]
    async fn test_login_logout_round_trip() {
        let h = harness(None);
        let mut replies = h
            .service
            .bus()
            .subscribe(SubjectFilter::subject(LOGIN_CLIENT_SUBJECT));
        let session = h.sessions.create();

        // Challenge with good credentials.
        h.service
            .store(auth_request(session.id(), "alice", "correct"));

        let reply = next_reply(&mut replies).await;
        assert_eq!(reply.command(), Some(Command::SuccessfulAuth));
        assert_eq!(reply.get_str(&PartKey::Name), Some("alice"));
        assert!(session.is_authenticated());
        assert!(session.has_role(&RoleToken::authenticated()));

        // End the session.
        h.service.store(
            Message::new(AUTHORIZATION_SERVICE_SUBJECT)
                .with_command(Command::EndSession)
                .with_session(session.id()),
        );

        timeout(Duration::from_millis(500), async {
            while session.is_authenticated() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("session should end");
        assert!(!session.has_role(&RoleToken::authenticated()));
    }

    #[tokio::test]
    async fn test_failed_login_replies_and_leaves_session_anonymous() {
        let h = harness(None);
        let mut replies = h
            .service
            .bus()
            .subscribe(SubjectFilter::subject(LOGIN_CLIENT_SUBJECT));
        let session = h.sessions.create();

        h.service.store(auth_request(session.id(), "alice", "wrong"));

        let reply = next_reply(&mut replies).await;
        assert_eq!(reply.command(), Some(Command::FailedAuth));
        assert_eq!(reply.get_str(&PartKey::Name), Some("alice"));
        assert!(!session.is_authenticated());

        // Retrying with bad credentials never sets the token.
        for _ in 0..3 {
            h.service.store(auth_request(session.id(), "alice", "wrong"));
            let reply = next_reply(&mut replies).await;
            assert_eq!(reply.command(), Some(Command::FailedAuth));
            assert!(!session.is_authenticated());
        }
    }

    #[tokio::test]
    async fn test_motd_attached_to_successful_login() {
        let h = harness(Some("Scheduled maintenance at 02:00 UTC"));
        let mut replies = h
            .service
            .bus()
            .subscribe(SubjectFilter::subject(LOGIN_CLIENT_SUBJECT));
        let session = h.sessions.create();

        h.service
            .store(auth_request(session.id(), "alice", "correct"));

        let reply = next_reply(&mut replies).await;
        assert_eq!(reply.command(), Some(Command::SuccessfulAuth));
        assert_eq!(
            reply.get_str(&PartKey::MessageText),
            Some("Scheduled maintenance at 02:00 UTC")
        );
    }

    #[tokio::test]
    async fn test_login_then_access_gated_subject() {
        let h = harness(None);
        h.service
            .adapter()
            .add_security_rule("Mailbox", relay_auth::RequiredRoles::authenticated());

        let mut mailbox = h.service.bus().subscribe(SubjectFilter::subject("Mailbox"));
        let mut replies = h
            .service
            .bus()
            .subscribe(SubjectFilter::subject(LOGIN_CLIENT_SUBJECT));
        let session = h.sessions.create();

        // Anonymous access is denied.
        h.service
            .store(Message::new("Mailbox").with_session(session.id()));
        let denial = next_reply(&mut replies).await;
        assert_eq!(denial.command(), Some(Command::FailedAuth));

        // Authenticate, then the same message shape is delivered.
        h.service
            .store(auth_request(session.id(), "alice", "correct"));
        let reply = next_reply(&mut replies).await;
        assert_eq!(reply.command(), Some(Command::SuccessfulAuth));

        h.service
            .store(Message::new("Mailbox").with_session(session.id()));
        let delivered = timeout(Duration::from_millis(500), mailbox.recv())
            .await
            .expect("timeout")
            .expect("delivery");
        assert_eq!(delivered.subject(), "Mailbox");
    }
}
