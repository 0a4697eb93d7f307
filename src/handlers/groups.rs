//! Group endpoints.

use serde::Serialize;

use crate::handlers::{Action, ActionResult, Call, Handler, HandlerError, OrNotFound};
use crate::http::response::ResponseEnvelope;
use crate::store::models::{Group, Id};

const INDEX_LIMIT: usize = 20;

#[derive(Debug, Serialize)]
pub struct GroupView {
    pub id: Id,
    pub name: String,
    pub categories: Vec<Id>,
    pub members_count: usize,
}

impl From<Group> for GroupView {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            members_count: group.member_ids.len(),
            name: group.name,
            categories: group.category_ids,
        }
    }
}

#[derive(Debug, Default)]
pub struct GroupApi {
    group: Option<Group>,
}

impl Handler for GroupApi {
    const NAME: &'static str = "GroupAPI";
    const AUTHENTICATED_ACTIONS: &'static [&'static str] = &["join", "leave"];

    fn action(id: &str) -> Option<Action<Self>> {
        let action: Action<Self> = match id {
            "index" => Self::index,
            "join" => Self::join,
            "leave" => Self::leave,
            _ => return None,
        };
        Some(action)
    }
}

impl GroupApi {
    /// Active public groups with categories, by name.
    fn index(&mut self, call: &Call<'_>) -> ActionResult {
        let mut groups = call
            .store()
            .groups
            .filter(|g| g.active && g.public && !g.category_ids.is_empty());
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        groups.truncate(INDEX_LIMIT);
        let views: Vec<GroupView> = groups.into_iter().map(GroupView::from).collect();
        Ok(ResponseEnvelope::json(200, &views)?)
    }

    fn join(&mut self, call: &Call<'_>) -> ActionResult {
        let user = call.require_user()?;
        let group = self.current_group(call)?;
        if !group.public {
            return Err(HandlerError::ResourceNotFound);
        }
        let id = group.id;
        call.store().groups.update(id, |g| {
            g.member_ids.insert(user.id);
        });
        Ok(ResponseEnvelope::ok("ok"))
    }

    fn leave(&mut self, call: &Call<'_>) -> ActionResult {
        let user = call.require_user()?;
        let id = self.current_group(call)?.id;
        call.store().groups.update(id, |g| {
            g.member_ids.remove(&user.id);
        });
        Ok(ResponseEnvelope::ok("ok"))
    }

    fn current_group(&mut self, call: &Call<'_>) -> Result<&Group, HandlerError> {
        if self.group.is_none() {
            self.group = call
                .params()
                .id("group_id")
                .and_then(|id| call.store().groups.get(id));
        }
        self.group.as_ref().or_not_found()
    }
}
