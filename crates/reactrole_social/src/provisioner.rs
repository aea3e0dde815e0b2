//! Role lookup and creation.

use crate::RolePlatform;
use reactrole_core::{RoleHandle, RoleName, ServerId};
use reactrole_error::PlatformResult;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Resolves role names to platform roles.
///
/// Lookup is by exact name and the first match wins. `ensure_role` is not
/// transactional: two callers racing on the same missing name can both
/// create it, leaving two roles with that name. The platform does not
/// enforce unique names and this type does not try to.
#[derive(Clone)]
pub struct RoleProvisioner {
    platform: Arc<dyn RolePlatform>,
}

impl RoleProvisioner {
    /// Create a provisioner over `platform`.
    pub fn new(platform: Arc<dyn RolePlatform>) -> Self {
        Self { platform }
    }

    /// Find a role by exact name without creating anything.
    #[instrument(skip(self), fields(server_id = %server, role = %name))]
    pub async fn find_role(
        &self,
        server: ServerId,
        name: &RoleName,
    ) -> PlatformResult<Option<RoleHandle>> {
        let roles = self.platform.list_roles(server).await?;
        let found = roles.into_iter().find(|role| role.name == *name);
        debug!(found = found.is_some(), "Role lookup");
        Ok(found)
    }

    /// Find a role by exact name, creating it when absent.
    #[instrument(skip(self), fields(server_id = %server, role = %name))]
    pub async fn ensure_role(&self, server: ServerId, name: &RoleName) -> PlatformResult<RoleHandle> {
        if let Some(role) = self.find_role(server, name).await? {
            return Ok(role);
        }

        let role = self.platform.create_role(server, name).await?;
        info!(role_id = %role.id, "Created new role");
        Ok(role)
    }
}
