mod entity_derive {
    #[test]
    fn accepts_generic_struct() {
        let t = trybuild::TestCases::new();
        t.pass("tests/ui/entity_generic_ok.rs");
    }

    #[test]
    fn accepts_base_and_getters() {
        let t = trybuild::TestCases::new();
        t.pass("tests/ui/entity_base_getter_ok.rs");
    }

    #[test]
    fn accepts_raw_identifiers() {
        let t = trybuild::TestCases::new();
        t.pass("tests/ui/entity_raw_ident_ok.rs");
    }
}
