use keysplit_core::Operation;

/// How an operation kind is spread across replicas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dispatch {
    /// Reads and lease traffic: the assigned replica only.
    ReadOne,
    /// Sets: every replica when `all_sync` is enabled, the assigned one otherwise.
    WriteAllIfSync,
    /// Deletes: every replica, unconditionally.
    AlwaysAll,
    /// Any other kind: the assigned replica only.
    FallbackOne,
}

/// Replicas a request is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fanout {
    /// Only the assigned replica.
    Assigned,
    /// The assigned replica synchronously, all others in the background.
    All,
}

impl Fanout {
    /// Label for tracing and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Fanout::Assigned => "assigned",
            Fanout::All => "all",
        }
    }
}

impl Dispatch {
    /// Dispatch rule for `operation`.
    pub fn for_operation(operation: Operation) -> Self {
        match operation {
            Operation::Get | Operation::LeaseGet | Operation::LeaseSet => Dispatch::ReadOne,
            Operation::Set => Dispatch::WriteAllIfSync,
            Operation::Delete => Dispatch::AlwaysAll,
            Operation::Add | Operation::Touch | Operation::Incr | Operation::Decr => {
                Dispatch::FallbackOne
            }
        }
    }

    /// Resolves the rule against the route's `all_sync` setting.
    pub fn fanout(self, all_sync: bool) -> Fanout {
        match self {
            Dispatch::ReadOne | Dispatch::FallbackOne => Fanout::Assigned,
            Dispatch::WriteAllIfSync if all_sync => Fanout::All,
            Dispatch::WriteAllIfSync => Fanout::Assigned,
            Dispatch::AlwaysAll => Fanout::All,
        }
    }
}
