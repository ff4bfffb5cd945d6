// @generated
// Wires up the buf-generated protobuf code. Regenerate with `buf generate`
// from this crate's directory.

pub mod users {
    pub mod v1 {
        include!("generated/users/v1/users.v1.rs");
        include!("generated/users/v1/users.v1.tonic.rs");
    }
}
