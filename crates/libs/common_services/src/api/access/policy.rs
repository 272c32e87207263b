use crate::api::access::{AccessError, TicketPass};
use common_types::{Album, AlbumId, Photo, PrivacyLevel, StoredPrivacy, UserId, Viewer};
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// Anonymous viewer, non-public resource.
    LoginRequired,
    /// Role ceiling below the resource's privacy level.
    InsufficientRole,
    /// Private resource, viewer is not the owner.
    PrivateOwnerOnly,
    /// The stored privacy is not one of the known levels.
    InvalidPrivacyValue,
}

impl DenyReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoginRequired => "login_required",
            Self::InsufficientRole => "insufficient_role",
            Self::PrivateOwnerOnly => "private_owner_only",
            Self::InvalidPrivacyValue => "invalid_privacy_value",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn into_result(self) -> Result<(), AccessError> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(AccessError::Denied(reason)),
        }
    }
}

/// What the evaluator needs to know about a photo or album.
#[derive(Debug, Clone, Copy)]
pub struct ProtectedResource<'a> {
    pub owner_id: UserId,
    pub privacy: &'a StoredPrivacy,
    /// The album itself, or the albums a photo belongs to.
    pub album_ids: &'a [AlbumId],
}

impl<'a> ProtectedResource<'a> {
    #[must_use]
    pub fn album(album: &'a Album) -> Self {
        Self {
            owner_id: album.owner_id,
            privacy: &album.view_privacy,
            album_ids: std::slice::from_ref(&album.id),
        }
    }

    #[must_use]
    pub const fn photo(photo: &'a Photo, album_ids: &'a [AlbumId]) -> Self {
        Self {
            owner_id: photo.owner_id,
            privacy: &photo.view_privacy,
            album_ids,
        }
    }
}

/// Decides read visibility. Holds no per-request state.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy {
    /// Lets admins see private resources of other owners.
    pub admin_can_view_private: bool,
}

impl AccessPolicy {
    #[must_use]
    pub const fn new(admin_can_view_private: bool) -> Self {
        Self {
            admin_can_view_private,
        }
    }

    /// Evaluates one resource. A pass covering one of the resource's albums allows
    /// it outright, otherwise the privacy level and the viewer's role decide.
    #[must_use]
    pub fn evaluate(
        &self,
        viewer: Option<&Viewer>,
        resource: &ProtectedResource<'_>,
        pass: Option<&TicketPass>,
    ) -> AccessDecision {
        if pass.is_some_and(|p| p.covers(resource.album_ids)) {
            return AccessDecision::Allow;
        }

        let Some(level) = resource.privacy.level() else {
            return AccessDecision::Deny(DenyReason::InvalidPrivacyValue);
        };

        match (level, viewer) {
            (PrivacyLevel::Public, _) => AccessDecision::Allow,
            (_, None) => AccessDecision::Deny(DenyReason::LoginRequired),
            (PrivacyLevel::Private, Some(viewer)) => {
                let is_owner = viewer.id == resource.owner_id;
                if is_owner || (self.admin_can_view_private && viewer.is_admin()) {
                    AccessDecision::Allow
                } else {
                    AccessDecision::Deny(DenyReason::PrivateOwnerOnly)
                }
            }
            (level, Some(viewer)) if viewer.role.ceiling() >= level => AccessDecision::Allow,
            (_, Some(_)) => AccessDecision::Deny(DenyReason::InsufficientRole),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_types::ViewerRole;
    use rstest::rstest;
    use uuid::Uuid;

    const OWNER: UserId = 1;
    const OTHER: UserId = 2;

    fn viewer(id: UserId, role: ViewerRole) -> Viewer {
        Viewer {
            id,
            email: format!("user{id}@example.com"),
            role,
        }
    }

    fn decide(policy: AccessPolicy, viewer: Option<&Viewer>, level: PrivacyLevel) -> AccessDecision {
        let privacy = StoredPrivacy::from(level);
        let album_ids = [Uuid::new_v4()];
        let resource = ProtectedResource {
            owner_id: OWNER,
            privacy: &privacy,
            album_ids: &album_ids,
        };
        policy.evaluate(viewer, &resource, None)
    }

    use AccessDecision::{Allow, Deny};
    use DenyReason::{InsufficientRole, LoginRequired, PrivateOwnerOnly};

    // Non-owner viewers, every role against every level.
    #[rstest]
    #[case(ViewerRole::Anonymous, PrivacyLevel::Public, Allow)]
    #[case(ViewerRole::Anonymous, PrivacyLevel::Member, Deny(InsufficientRole))]
    #[case(ViewerRole::Anonymous, PrivacyLevel::Friend, Deny(InsufficientRole))]
    #[case(ViewerRole::Anonymous, PrivacyLevel::Family, Deny(InsufficientRole))]
    #[case(ViewerRole::Anonymous, PrivacyLevel::Private, Deny(PrivateOwnerOnly))]
    #[case(ViewerRole::User, PrivacyLevel::Public, Allow)]
    #[case(ViewerRole::User, PrivacyLevel::Member, Allow)]
    #[case(ViewerRole::User, PrivacyLevel::Friend, Deny(InsufficientRole))]
    #[case(ViewerRole::User, PrivacyLevel::Family, Deny(InsufficientRole))]
    #[case(ViewerRole::User, PrivacyLevel::Private, Deny(PrivateOwnerOnly))]
    #[case(ViewerRole::Friend, PrivacyLevel::Public, Allow)]
    #[case(ViewerRole::Friend, PrivacyLevel::Member, Allow)]
    #[case(ViewerRole::Friend, PrivacyLevel::Friend, Allow)]
    #[case(ViewerRole::Friend, PrivacyLevel::Family, Deny(InsufficientRole))]
    #[case(ViewerRole::Friend, PrivacyLevel::Private, Deny(PrivateOwnerOnly))]
    #[case(ViewerRole::Family, PrivacyLevel::Public, Allow)]
    #[case(ViewerRole::Family, PrivacyLevel::Member, Allow)]
    #[case(ViewerRole::Family, PrivacyLevel::Friend, Allow)]
    #[case(ViewerRole::Family, PrivacyLevel::Family, Allow)]
    #[case(ViewerRole::Family, PrivacyLevel::Private, Deny(PrivateOwnerOnly))]
    #[case(ViewerRole::Admin, PrivacyLevel::Public, Allow)]
    #[case(ViewerRole::Admin, PrivacyLevel::Member, Allow)]
    #[case(ViewerRole::Admin, PrivacyLevel::Friend, Allow)]
    #[case(ViewerRole::Admin, PrivacyLevel::Family, Allow)]
    #[case(ViewerRole::Admin, PrivacyLevel::Private, Deny(PrivateOwnerOnly))]
    fn test_role_level_grid(
        #[case] role: ViewerRole,
        #[case] level: PrivacyLevel,
        #[case] expected: AccessDecision,
    ) {
        let v = viewer(OTHER, role);
        assert_eq!(decide(AccessPolicy::default(), Some(&v), level), expected);
    }

    #[rstest]
    #[case(PrivacyLevel::Public, Allow)]
    #[case(PrivacyLevel::Member, Deny(LoginRequired))]
    #[case(PrivacyLevel::Friend, Deny(LoginRequired))]
    #[case(PrivacyLevel::Family, Deny(LoginRequired))]
    #[case(PrivacyLevel::Private, Deny(LoginRequired))]
    fn test_no_viewer(#[case] level: PrivacyLevel, #[case] expected: AccessDecision) {
        assert_eq!(decide(AccessPolicy::default(), None, level), expected);
    }

    #[rstest]
    #[case(ViewerRole::Anonymous)]
    #[case(ViewerRole::User)]
    #[case(ViewerRole::Family)]
    fn test_owner_sees_private(#[case] role: ViewerRole) {
        let owner = viewer(OWNER, role);
        assert_eq!(
            decide(AccessPolicy::default(), Some(&owner), PrivacyLevel::Private),
            Allow
        );
    }

    #[test]
    fn test_admin_private_override_is_configurable() {
        let admin = viewer(OTHER, ViewerRole::Admin);
        assert_eq!(
            decide(AccessPolicy::new(true), Some(&admin), PrivacyLevel::Private),
            Allow
        );
        let family = viewer(OTHER, ViewerRole::Family);
        assert_eq!(
            decide(AccessPolicy::new(true), Some(&family), PrivacyLevel::Private),
            Deny(PrivateOwnerOnly)
        );
    }

    #[test]
    fn test_unrecognized_privacy_is_denied() {
        let privacy = StoredPrivacy::Unrecognized("members".to_owned());
        let resource = ProtectedResource {
            owner_id: OWNER,
            privacy: &privacy,
            album_ids: &[],
        };
        let owner = viewer(OWNER, ViewerRole::Admin);
        for v in [None, Some(&owner)] {
            assert_eq!(
                AccessPolicy::new(true).evaluate(v, &resource, None),
                Deny(DenyReason::InvalidPrivacyValue)
            );
        }
    }

    #[test]
    fn test_pass_overrides_privacy_only_for_its_album() {
        let album_a = Uuid::new_v4();
        let album_b = Uuid::new_v4();
        let pass = TicketPass::for_album(album_a);
        let privacy = StoredPrivacy::from(PrivacyLevel::Private);

        let in_a = ProtectedResource {
            owner_id: OWNER,
            privacy: &privacy,
            album_ids: &[album_a],
        };
        let in_b = ProtectedResource {
            owner_id: OWNER,
            privacy: &privacy,
            album_ids: &[album_b],
        };
        let policy = AccessPolicy::default();
        assert_eq!(policy.evaluate(None, &in_a, Some(&pass)), Allow);
        assert_eq!(policy.evaluate(None, &in_b, Some(&pass)), Deny(LoginRequired));
    }
}
