/// Identifier for a particle in a [`crate::field::Field`].
///
/// This is an index into the field's particle slice, and is only
/// meaningful for the lifetime of a given `Field` instance. A field
/// rebuilt on resize invalidates every id handed out before.
pub type ParticleId = usize;
