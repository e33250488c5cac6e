use boxflow_core::Catalog;

pub fn handle(catalog: &Catalog) {
    for name in catalog.all_names() {
        println!("{}", name);
    }
}
