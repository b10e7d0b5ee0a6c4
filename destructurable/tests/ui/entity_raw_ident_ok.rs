use destructurable::{DestructuringPolicy, Entity};

#[derive(Clone, Entity)]
pub struct Item {
    pub r#type: String,
}

fn main() {
    let policy = DestructuringPolicy::builder()
        .entity::<Item>(|i| {
            i.field("type").rename("Kind");
        })
        .build()
        .unwrap();
    let _ = policy.destructure(&Item {
        r#type: "book".into(),
    });
}
