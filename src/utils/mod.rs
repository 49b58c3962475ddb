pub mod time;

/// Random 21 character id, used to tag a conversation in logs.
pub fn longid() -> String {
    nanoid::nanoid!()
}
