/// Response type for the `Module::call` method.
///
/// Events emitted by a call are recorded in the working set, so the response
/// carries nothing yet.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CallResponse {}
