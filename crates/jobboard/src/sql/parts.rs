/// A piece of a composed SQL statement.
///
/// Raw text is emitted verbatim; each `Param` renders as the next `$N`
/// placeholder when the statement is built.
#[derive(Debug, Clone)]
pub(crate) enum SqlPart {
    Raw(String),
    Param,
}
