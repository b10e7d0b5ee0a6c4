use destructurable::{DestructuringPolicy, Entity};

#[derive(Clone, Entity)]
pub struct Person {
    pub name: String,
}

#[derive(Clone, Entity)]
#[destructure(getter = "initials")]
pub struct Employee {
    #[destructure(base)]
    person: Person,
    pub(crate) badge: u32,
    #[destructure(skip)]
    pub cache: Vec<u8>,
}

impl Employee {
    fn initials(&self) -> String {
        self.person.name.chars().take(1).collect()
    }
}

fn main() {
    let employee = Employee {
        person: Person {
            name: "Ann".into(),
        },
        badge: 7,
        cache: Vec::new(),
    };
    let policy = DestructuringPolicy::builder()
        .entity::<Employee>(|e| {
            e.field("name").rename("FullName");
            e.field("initials").ignore();
        })
        .build()
        .unwrap();
    let _ = policy.destructure(&employee);
    let _ = &employee.cache;
}
