use std::fmt;

/// The two connection categories a report touches: the metadata database the
/// query designer reads schema/join definitions from, and the application
/// database generated SQL runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionRole {
    /// Query-designer metadata (`QD`)
    Builder,
    /// Application data (`AP`)
    Application,
}

impl ConnectionRole {
    pub fn code(&self) -> &'static str {
        match self {
            ConnectionRole::Builder => "QD",
            ConnectionRole::Application => "AP",
        }
    }
}

impl fmt::Display for ConnectionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Connection collaborator: turns a key into a connection string. The core
/// only ever carries keys.
pub trait ConnectionResolver {
    fn resolve(&self, role: ConnectionRole, key: &str) -> Option<String>;

    fn builder_connection(&self, key: &str) -> Option<String> {
        self.resolve(ConnectionRole::Builder, key)
    }

    fn application_connection(&self, key: &str) -> Option<String> {
        self.resolve(ConnectionRole::Application, key)
    }
}
