//! Recording in-memory platform for testing.

use async_trait::async_trait;
use reactrole_core::{ChannelId, Emoji, MessageId, RoleHandle, RoleId, RoleName, ServerId, UserId};
use reactrole_error::{PlatformError, PlatformErrorKind, PlatformResult};
use reactrole_social::{MessageSnapshot, ReactionSnapshot, RolePlatform};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// One call made into the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListRoles(ServerId),
    CreateRole(ServerId, String),
    GrantRole(UserId, RoleId),
    RevokeRole(UserId, RoleId),
    IsBot(UserId),
    DirectMessage(UserId, String),
    ChannelInServer(ChannelId),
    PostMessage(ChannelId, String),
    FetchMessage(MessageId),
    EditMessage(MessageId, String),
    AddReaction(MessageId, String),
    RemoveOwnReaction(MessageId, String),
}

impl Call {
    /// Whether the call changes anything on the platform.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Call::ListRoles(_) | Call::IsBot(_) | Call::ChannelInServer(_) | Call::FetchMessage(_)
        )
    }
}

#[derive(Debug, Clone, Default)]
struct FakeMessage {
    content: String,
    reactions: Vec<ReactionSnapshot>,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    roles: HashMap<ServerId, Vec<RoleHandle>>,
    members: HashSet<(UserId, RoleId)>,
    channels: HashSet<(ServerId, ChannelId)>,
    bots: HashSet<UserId>,
    messages: HashMap<MessageId, FakeMessage>,
    posted: Vec<MessageId>,
    failing_emoji: HashSet<String>,
    fail_create_role: bool,
    fail_grant: bool,
    fail_edit: bool,
    fail_channel_lookup: bool,
    next_id: u64,
}

/// Mock platform that records every call.
///
/// Tests seed roles, channels and messages, inject failures, then inspect
/// the recorded calls and resulting platform state.
pub struct MockPlatform {
    state: Mutex<State>,
}

impl MockPlatform {
    /// Create an empty platform.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 9000,
                ..State::default()
            }),
        }
    }

    /// Add an existing role and return its id.
    pub fn with_role(&self, server: ServerId, name: &str) -> RoleId {
        let mut state = self.state.lock().unwrap();
        let id = RoleId::new(state.next_id);
        state.next_id += 1;
        state
            .roles
            .entry(server)
            .or_default()
            .push(RoleHandle::new(id, RoleName::new(name)));
        id
    }

    /// Add a channel to a server.
    pub fn with_channel(&self, server: ServerId, channel: ChannelId) {
        self.state.lock().unwrap().channels.insert((server, channel));
    }

    /// Mark a user account as a bot.
    pub fn with_bot(&self, user: UserId) {
        self.state.lock().unwrap().bots.insert(user);
    }

    /// Add an existing message. Emoji are given in stored form, e.g. `name:id`.
    pub fn with_message(&self, message: MessageId, content: &str, reactions: &[(&str, u64, bool)]) {
        let reactions = reactions
            .iter()
            .map(|(emoji, count, me)| ReactionSnapshot {
                emoji: Emoji::parse(emoji).unwrap(),
                count: *count,
                me: *me,
            })
            .collect();
        self.state.lock().unwrap().messages.insert(
            message,
            FakeMessage {
                content: content.to_string(),
                reactions,
            },
        );
    }

    /// Make reaction calls for `emoji` fail.
    pub fn fail_reactions_for(&self, emoji: &str) {
        self.state.lock().unwrap().failing_emoji.insert(emoji.to_string());
    }

    /// Make role creation fail.
    pub fn fail_create_role(&self) {
        self.state.lock().unwrap().fail_create_role = true;
    }

    /// Make role grants fail.
    pub fn fail_grant(&self) {
        self.state.lock().unwrap().fail_grant = true;
    }

    /// Make message edits fail.
    pub fn fail_edit(&self) {
        self.state.lock().unwrap().fail_edit = true;
    }

    /// Make channel lookups fail.
    pub fn fail_channel_lookup(&self) {
        self.state.lock().unwrap().fail_channel_lookup = true;
    }

    /// Every call so far.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of mutating calls so far.
    pub fn mutation_count(&self) -> usize {
        self.calls().iter().filter(|c| c.is_mutation()).count()
    }

    /// Forget recorded calls, keeping platform state.
    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Direct messages sent to `user`.
    pub fn direct_messages(&self, user: UserId) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::DirectMessage(to, text) if to == user => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Roles of a server with the given name.
    pub fn roles_named(&self, server: ServerId, name: &str) -> Vec<RoleHandle> {
        self.state
            .lock()
            .unwrap()
            .roles
            .get(&server)
            .map(|roles| roles.iter().filter(|r| r.name == *name).cloned().collect())
            .unwrap_or_default()
    }

    /// Whether `user` holds `role`.
    pub fn has_role(&self, user: UserId, role: RoleId) -> bool {
        self.state.lock().unwrap().members.contains(&(user, role))
    }

    /// Current body of a message.
    pub fn content(&self, message: MessageId) -> String {
        self.state.lock().unwrap().messages[&message].content.clone()
    }

    /// Emoji the bot reacted with on a message, in display order.
    pub fn own_reactions(&self, message: MessageId) -> Vec<String> {
        self.state.lock().unwrap().messages[&message]
            .reactions
            .iter()
            .filter(|r| r.me)
            .map(|r| r.emoji.to_string())
            .collect()
    }

    /// All reactions on a message as `(emoji, count, me)`.
    pub fn reactions(&self, message: MessageId) -> Vec<(String, u64, bool)> {
        self.state.lock().unwrap().messages[&message]
            .reactions
            .iter()
            .map(|r| (r.emoji.to_string(), r.count, r.me))
            .collect()
    }

    /// Id of the most recently posted message.
    pub fn last_posted(&self) -> Option<MessageId> {
        self.state.lock().unwrap().posted.last().copied()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn api_failure(operation: &str) -> PlatformError {
    PlatformError::api(operation, "injected failure")
}

fn not_found(what: impl Into<String>) -> PlatformError {
    PlatformError::new(PlatformErrorKind::NotFound(what.into()))
}

#[async_trait]
impl RolePlatform for MockPlatform {
    async fn list_roles(&self, server: ServerId) -> PlatformResult<Vec<RoleHandle>> {
        self.record(Call::ListRoles(server));
        Ok(self
            .state
            .lock()
            .unwrap()
            .roles
            .get(&server)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_role(&self, server: ServerId, name: &RoleName) -> PlatformResult<RoleHandle> {
        self.record(Call::CreateRole(server, name.to_string()));
        let mut state = self.state.lock().unwrap();
        if state.fail_create_role {
            return Err(api_failure("roles.create"));
        }
        let role = RoleHandle::new(RoleId::new(state.next_id), name.clone());
        state.next_id += 1;
        state.roles.entry(server).or_default().push(role.clone());
        Ok(role)
    }

    async fn grant_role(&self, _server: ServerId, user: UserId, role: RoleId) -> PlatformResult<()> {
        self.record(Call::GrantRole(user, role));
        let mut state = self.state.lock().unwrap();
        if state.fail_grant {
            return Err(api_failure("members.add_role"));
        }
        state.members.insert((user, role));
        Ok(())
    }

    async fn revoke_role(&self, _server: ServerId, user: UserId, role: RoleId) -> PlatformResult<()> {
        self.record(Call::RevokeRole(user, role));
        self.state.lock().unwrap().members.remove(&(user, role));
        Ok(())
    }

    async fn is_bot(&self, user: UserId) -> PlatformResult<bool> {
        self.record(Call::IsBot(user));
        Ok(self.state.lock().unwrap().bots.contains(&user))
    }

    async fn send_direct_message(&self, user: UserId, content: &str) -> PlatformResult<()> {
        self.record(Call::DirectMessage(user, content.to_string()));
        Ok(())
    }

    async fn channel_in_server(&self, server: ServerId, channel: ChannelId) -> PlatformResult<bool> {
        self.record(Call::ChannelInServer(channel));
        let state = self.state.lock().unwrap();
        if state.fail_channel_lookup {
            return Err(api_failure("channels.list"));
        }
        Ok(state.channels.contains(&(server, channel)))
    }

    async fn post_message(&self, channel: ChannelId, content: &str) -> PlatformResult<MessageId> {
        self.record(Call::PostMessage(channel, content.to_string()));
        let mut state = self.state.lock().unwrap();
        let id = MessageId::new(state.next_id);
        state.next_id += 1;
        state.posted.push(id);
        state.messages.insert(
            id,
            FakeMessage {
                content: content.to_string(),
                reactions: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn fetch_message(
        &self,
        _channel: ChannelId,
        message: MessageId,
    ) -> PlatformResult<MessageSnapshot> {
        self.record(Call::FetchMessage(message));
        let state = self.state.lock().unwrap();
        let found = state
            .messages
            .get(&message)
            .ok_or_else(|| not_found(format!("message {message}")))?;
        Ok(MessageSnapshot {
            content: found.content.clone(),
            reactions: found.reactions.clone(),
        })
    }

    async fn edit_message(
        &self,
        _channel: ChannelId,
        message: MessageId,
        content: &str,
    ) -> PlatformResult<()> {
        self.record(Call::EditMessage(message, content.to_string()));
        let mut state = self.state.lock().unwrap();
        if state.fail_edit {
            return Err(api_failure("messages.edit"));
        }
        let found = state
            .messages
            .get_mut(&message)
            .ok_or_else(|| not_found(format!("message {message}")))?;
        // Stored content loses trailing whitespace, as on Discord
        found.content = content.trim_end().to_string();
        Ok(())
    }

    async fn add_reaction(
        &self,
        _channel: ChannelId,
        message: MessageId,
        emoji: &Emoji,
    ) -> PlatformResult<()> {
        self.record(Call::AddReaction(message, emoji.to_string()));
        let mut state = self.state.lock().unwrap();
        if state.failing_emoji.contains(emoji.as_str()) {
            return Err(api_failure("reactions.add"));
        }
        let found = state
            .messages
            .get_mut(&message)
            .ok_or_else(|| not_found(format!("message {message}")))?;
        match found.reactions.iter_mut().find(|r| r.emoji == *emoji) {
            Some(existing) if existing.me => {}
            Some(existing) => {
                existing.me = true;
                existing.count += 1;
            }
            None => found.reactions.push(ReactionSnapshot {
                emoji: emoji.clone(),
                count: 1,
                me: true,
            }),
        }
        Ok(())
    }

    async fn remove_own_reaction(
        &self,
        _channel: ChannelId,
        message: MessageId,
        emoji: &Emoji,
    ) -> PlatformResult<()> {
        self.record(Call::RemoveOwnReaction(message, emoji.to_string()));
        let mut state = self.state.lock().unwrap();
        if state.failing_emoji.contains(emoji.as_str()) {
            return Err(api_failure("reactions.remove_own"));
        }
        let found = state
            .messages
            .get_mut(&message)
            .ok_or_else(|| not_found(format!("message {message}")))?;
        if let Some(existing) = found.reactions.iter_mut().find(|r| r.emoji == *emoji && r.me) {
            existing.me = false;
            existing.count -= 1;
        }
        found.reactions.retain(|r| r.count > 0);
        Ok(())
    }

    fn platform_name(&self) -> &str {
        "mock"
    }
}
