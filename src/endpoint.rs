//! Registry of the API endpoints known to the client.
use crate::template::{placeholders, Template};

macro_rules! endpoints {
    ($( $(#[$meta:meta])* $variant:ident => $template:literal, )*) => {
        /// A symbolic API endpoint.
        ///
        /// Select one with [`DirectusClient::endpoint`](crate::DirectusClient::endpoint), then bind
        /// the placeholders listed by [`Endpoint::parameters`]. `:project` is bound automatically
        /// when the client has a project.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Endpoint {
            $( $(#[$meta])* #[doc = concat!("`", $template, "`")] $variant, )*
        }

        impl Endpoint {
            /// Every registered endpoint.
            pub const ALL: &'static [Endpoint] = &[ $( Endpoint::$variant, )* ];

            /// Path template relative to the base URL.
            pub fn path(&self) -> &'static str {
                match self {
                    $( Endpoint::$variant => $template, )*
                }
            }
        }
    };
}

endpoints! {
    Authenticate => ":project/auth/authenticate",
    RefreshToken => ":project/auth/refresh",

    Activities => ":project/activity",
    Activity => ":project/activity/:id",
    Comments => ":project/activity/comment",
    Comment => ":project/activity/comment/:id",

    Asset => ":project/assets/:key",

    Collections => ":project/collections",
    Collection => ":project/collections/:collection",

    Interfaces => "interfaces",
    Layouts => "layouts",
    Modules => "modules",

    Fields => ":project/fields",
    CollectionFields => ":project/fields/:collection",
    Field => ":project/fields/:collection/:field",

    Files => ":project/files",
    File => ":project/files/:id",
    FileRevisions => ":project/files/:id/revisions",
    FileRevision => ":project/files/:id/revisions/:offset",

    Folders => ":project/folders",
    Folder => ":project/folders/:id",

    Items => ":project/items/:collection",
    Item => ":project/items/:collection/:id",
    ItemRevisions => ":project/items/:collection/:id/revisions",
    ItemRevision => ":project/items/:collection/:id/revisions/:offset",
    ItemRevert => ":project/items/:collection/:id/revert/:revision",

    Mail => ":project/mail",

    Presets => ":project/collection_presets",
    Preset => ":project/collection_presets/:id",

    /// Requires the `super_admin_token` query parameter.
    ServerInfo => "server/info",
    ServerPing => "server/ping",
    ServerProjects => "server/projects",
    /// A single project as seen by the server. `:project` here names the project to look up, not
    /// necessarily the client's own project.
    ServerProject => "server/projects/:project",
    /// Root of the client's project.
    ProjectRoot => ":project/",

    Hash => ":project/utils/hash",
    HashMatch => ":project/utils/hash/match",
    RandomString => ":project/utils/random/string",
    TwoFactorSecret => ":project/utils/2fa_secret",

    Permissions => ":project/permissions",
    Permission => ":project/permissions/:id",
    MyPermissions => ":project/permissions/me",
    MyCollectionPermissions => ":project/permissions/me/:collection",

    Relations => ":project/relations",
    Relation => ":project/relations/:id",

    Revisions => ":project/revisions",
    Revision => ":project/revisions/:id",

    Roles => ":project/roles",
    Role => ":project/roles/:id",

    ScimUsers => ":project/scim/v2/Users",
    ScimUser => ":project/scim/v2/Users/:external_id",
    ScimGroups => ":project/scim/v2/Groups",
    ScimGroup => ":project/scim/v2/Groups/:id",

    Settings => ":project/settings",
    Setting => ":project/settings/:id",

    Users => ":project/users",
    User => ":project/users/:id",
    Me => ":project/users/me",
    Invite => ":project/users/invite",
    AcceptInvite => ":project/users/invite/:token",
    TrackPage => ":project/users/:id/tracking/page",
    UserRevisions => ":project/users/:id/revisions",
    UserRevision => ":project/users/:id/revisions/:offset",
}

impl Endpoint {
    /// The path as a [`Template`].
    pub fn template(&self) -> Template {
        Template::new(self.path())
    }

    /// Placeholder names that must be bound before dispatch.
    pub fn parameters(&self) -> Vec<&'static str> {
        placeholders(self.path())
    }
}

impl From<Endpoint> for Template {
    fn from(value: Endpoint) -> Self {
        value.template()
    }
}
