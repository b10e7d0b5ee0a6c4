use destructurable::{DestructuringPolicy, Entity};

#[derive(Clone, Entity)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

fn main() {
    let page = Page {
        items: vec!["a".to_string()],
        total: 1,
    };
    let policy = DestructuringPolicy::builder()
        .entity::<Page<String>>(|p| {
            p.field("items").mask();
        })
        .build()
        .unwrap();
    let _ = policy.destructure(&page);
}
