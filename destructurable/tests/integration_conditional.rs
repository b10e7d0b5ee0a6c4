//! Tests for conditional field rules.
//!
//! A rule with a condition applies only when the condition holds; otherwise
//! the field is emitted under its own name with its realized value.

use destructurable::{DestructuringPolicy, Entity, Scalar, StructuredValue};

#[derive(Clone, Entity)]
struct Contact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub vip: bool,
}

fn contact(email: Option<&str>, vip: bool) -> Contact {
    Contact {
        name: "Ann".into(),
        email: email.map(Into::into),
        phone: Some("555-0100".into()),
        vip,
    }
}

fn str_value(value: &str) -> StructuredValue {
    StructuredValue::Scalar(Scalar::Str(value.into()))
}

mod entity_predicate {
    use super::*;

    fn policy() -> DestructuringPolicy {
        DestructuringPolicy::builder()
            .entity::<Contact>(|c| {
                c.field("phone").mask().apply_when(|contact| contact.vip);
                c.field("name")
                    .rename("DisplayName")
                    .apply_when(|contact| !contact.vip);
            })
            .build()
            .unwrap()
    }

    #[test]
    fn applies_when_predicate_holds() {
        let tree = policy().destructure(&contact(None, true));
        let structure = tree.as_structure().unwrap();
        assert_eq!(structure.get("phone"), Some(&str_value("**********")));
        assert_eq!(structure.get("name"), Some(&str_value("Ann")));
    }

    #[test]
    fn falls_back_to_name_and_value_otherwise() {
        let tree = policy().destructure(&contact(None, false));
        let structure = tree.as_structure().unwrap();
        assert_eq!(structure.get("phone"), Some(&str_value("555-0100")));
        assert_eq!(structure.get("DisplayName"), Some(&str_value("Ann")));
        assert_eq!(structure.get("name"), None);
    }

    #[test]
    fn ignore_with_false_condition_keeps_the_field() {
        let policy = DestructuringPolicy::builder()
            .entity::<Contact>(|c| {
                c.field("vip").ignore().apply_when(|contact| !contact.vip);
            })
            .build()
            .unwrap();

        let hidden = policy.destructure(&contact(None, false));
        assert_eq!(hidden.as_structure().unwrap().get("vip"), None);

        let shown = policy.destructure(&contact(None, true));
        assert_eq!(
            shown.as_structure().unwrap().get("vip"),
            Some(&StructuredValue::Scalar(Scalar::Bool(true)))
        );
    }

    #[test]
    fn condition_on_aliased_rule_falls_back_to_field_name() {
        let policy = DestructuringPolicy::builder()
            .entity::<Contact>(|c| {
                c.field("phone")
                    .as_scalar(true)
                    .alias("Phone")
                    .apply_when(|contact| contact.email.is_some());
            })
            .build()
            .unwrap();

        let without_email = policy.destructure(&contact(None, false));
        let structure = without_email.as_structure().unwrap();
        assert_eq!(structure.get("phone"), Some(&str_value("555-0100")));
        assert_eq!(structure.get("Phone"), None);

        let with_email = policy.destructure(&contact(Some("ann@example.com"), false));
        let structure = with_email.as_structure().unwrap();
        assert_eq!(structure.get("Phone"), Some(&str_value("555-0100")));
    }
}

mod null_conditions {
    use super::*;

    #[test]
    fn apply_when_not_null() {
        let policy = DestructuringPolicy::builder()
            .entity::<Contact>(|c| {
                c.field("email").mask().alias("Email").apply_when_not_null();
            })
            .build()
            .unwrap();

        let present = policy.destructure(&contact(Some("ann@example.com"), false));
        assert_eq!(
            present.as_structure().unwrap().get("Email"),
            Some(&str_value("**********"))
        );

        let absent = policy.destructure(&contact(None, false));
        let structure = absent.as_structure().unwrap();
        assert_eq!(structure.get("email"), Some(&StructuredValue::NULL));
        assert_eq!(structure.get("Email"), None);
    }

    #[test]
    fn apply_when_null() {
        let policy = DestructuringPolicy::builder()
            .entity::<Contact>(|c| {
                c.field("email").ignore().apply_when_null();
            })
            .build()
            .unwrap();

        let absent = policy.destructure(&contact(None, false));
        assert_eq!(absent.as_structure().unwrap().get("email"), None);

        let present = policy.destructure(&contact(Some("ann@example.com"), false));
        assert_eq!(
            present.as_structure().unwrap().get("email"),
            Some(&str_value("ann@example.com"))
        );
    }

    #[test]
    fn later_condition_replaces_earlier_one() {
        let policy = DestructuringPolicy::builder()
            .entity::<Contact>(|c| {
                c.field("email").ignore().apply_when_null();
                c.field("email").ignore().apply_when_not_null();
            })
            .build()
            .unwrap();

        let absent = policy.destructure(&contact(None, false));
        assert_eq!(
            absent.as_structure().unwrap().get("email"),
            Some(&StructuredValue::NULL)
        );
        let present = policy.destructure(&contact(Some("ann@example.com"), false));
        assert_eq!(present.as_structure().unwrap().get("email"), None);
    }
}
