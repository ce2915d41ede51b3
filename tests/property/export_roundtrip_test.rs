//! Property-based tests for export/import round-trips.
//!
//! Exporting a store and importing the document into an empty store must
//! reproduce names, tabs, order and timestamps. Only ids are reassigned.

use std::sync::Arc;

use proptest::prelude::*;

use tab_collections::browser::InMemoryBrowser;
use tab_collections::managers::collection_store::{CollectionStore, CollectionStoreTrait};
use tab_collections::storage::MemoryStorage;
use tab_collections::types::collection::Tab;

fn arb_tab() -> impl Strategy<Value = Tab> {
    (
        "https://[a-z]{1,12}\\.(com|org|io)/[a-z0-9/]{0,16}",
        "[A-Za-z0-9 .,'\"!?-]{0,30}",
        proptest::option::of("https://[a-z]{1,8}\\.com/favicon\\.ico"),
    )
        .prop_map(|(url, title, icon)| Tab {
            url,
            title,
            fav_icon_url: icon.unwrap_or_default(),
        })
}

/// Distinct (case-insensitive) names, each with a tab list.
fn arb_entries() -> impl Strategy<Value = Vec<(String, Vec<Tab>)>> {
    prop::collection::btree_map(
        "[a-z][a-z0-9 ]{0,15}[a-z0-9]",
        prop::collection::vec(arb_tab(), 0..6),
        1..8,
    )
    .prop_map(|entries| entries.into_iter().collect())
}

fn empty_store() -> CollectionStore {
    CollectionStore::new(Arc::new(MemoryStorage::new()), Arc::new(InMemoryBrowser::new()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn export_then_import_preserves_content(entries in arb_entries(), pretty in any::<bool>()) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async {
            let mut source = empty_store();
            source.load().await.unwrap();
            for (name, tabs) in &entries {
                source.create(name, tabs.clone()).await.unwrap();
            }
            let json = source.export_json(pretty).unwrap();

            let mut target = empty_store();
            target.load().await.unwrap();
            let added = target.import_json(&json).await.unwrap();
            prop_assert_eq!(added, entries.len());

            let before = source.collections();
            let after = target.collections();
            prop_assert_eq!(before.len(), after.len());
            for (original, imported) in before.iter().zip(after) {
                prop_assert_eq!(&original.name, &imported.name);
                prop_assert_eq!(&original.tabs, &imported.tabs);
                prop_assert_eq!(original.created_at, imported.created_at);
                prop_assert_eq!(original.updated_at, imported.updated_at);
                prop_assert_ne!(&original.id, &imported.id);
            }

            // A second import of the same document collides on every name.
            prop_assert_eq!(target.import_json(&json).await.unwrap(), 0);
            prop_assert_eq!(target.len(), entries.len());
            Ok::<(), TestCaseError>(())
        })?;
    }
}
