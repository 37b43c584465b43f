use anyhow::{Context, Result};
use listsync_config::ListSelection;
use listsync_models::{DataPair, ImdbList, ListPair, ListTarget, TraktItem, TraktList, WATCHLIST_NAME};
use listsync_sources::{CatalogSource, SourceError, TrackerDestination};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use crate::diff::difference;
use crate::lists::{orphaned_lists, selected_list_ids};

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncOptions {
    pub lists: ListSelection,
    /// Compute and report every change without writing to Trakt
    pub dry_run: bool,
}

/// Outcome for one list pair
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListReport {
    pub name: String,
    pub imdb_list_id: String,
    pub watchlist: bool,
    pub created: bool,
    pub added: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncResult {
    pub lists: Vec<ListReport>,
    pub lists_deleted: Vec<String>,
    pub ratings_added: usize,
    pub ratings_removed: usize,
    pub history_added: usize,
    pub history_removed: usize,
    pub dry_run: bool,
    pub duration: Duration,
}

impl SyncResult {
    pub fn lists_created(&self) -> usize {
        self.lists.iter().filter(|list| list.created).count()
    }

    /// Total number of item-level changes, applied or (in a dry run) planned
    pub fn changes(&self) -> usize {
        let list_changes: usize = self.lists.iter().map(|list| list.added + list.removed).sum();
        list_changes
            + self.lists_created()
            + self.lists_deleted.len()
            + self.ratings_added
            + self.ratings_removed
            + self.history_added
            + self.history_removed
    }
}

/// State fetched at the start of a pass
struct Gathered {
    trakt_user: String,
    pairs: Vec<ListPair>,
    /// Every IMDb list name seen, merged ones included
    names: Vec<String>,
    created: Vec<String>,
    ratings: DataPair,
}

/// Drives one full IMDb → Trakt pass: gather, list phase, ratings phase.
///
/// Every adapter call is awaited before the next one is issued. The first
/// adapter error other than a handled `NotFound` aborts the pass, leaving Trakt
/// as it was after the last successful write.
pub struct SyncOrchestrator {
    catalog: Box<dyn CatalogSource>,
    tracker: Box<dyn TrackerDestination>,
    options: SyncOptions,
}

impl SyncOrchestrator {
    pub fn new(catalog: Box<dyn CatalogSource>, tracker: Box<dyn TrackerDestination>) -> Self {
        Self {
            catalog,
            tracker,
            options: SyncOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    #[instrument(skip(self))]
    pub async fn sync(&mut self) -> Result<SyncResult> {
        let start = Instant::now();
        info!(
            operation = "sync_start",
            source = self.catalog.source_name(),
            destination = self.tracker.destination_name(),
            lists = %self.options.lists,
            dry_run = self.options.dry_run,
            "Starting sync"
        );

        self.catalog
            .authenticate()
            .await
            .with_context(|| format!("Failed to authenticate to {}", self.catalog.source_name()))?;
        self.tracker
            .authenticate()
            .await
            .with_context(|| format!("Failed to authenticate to {}", self.tracker.destination_name()))?;

        let gathered = self.gather().await?;

        let mut result = SyncResult {
            dry_run: self.options.dry_run,
            ..SyncResult::default()
        };
        self.sync_lists(&gathered, &mut result).await?;
        self.sync_ratings(&gathered.ratings, &mut result).await?;

        result.duration = start.elapsed();
        info!(
            operation = "sync_complete",
            lists = result.lists.len(),
            lists_created = result.lists_created(),
            lists_deleted = result.lists_deleted.len(),
            ratings_added = result.ratings_added,
            ratings_removed = result.ratings_removed,
            history_added = result.history_added,
            history_removed = result.history_removed,
            duration_ms = result.duration.as_millis() as u64,
            "Sync complete"
        );
        Ok(result)
    }

    async fn gather(&self) -> Result<Gathered> {
        let trakt_user = self.tracker.user_id().await.context("Failed to resolve Trakt user")?;
        let imdb_user = self.catalog.user_id().await.context("Failed to resolve IMDb user")?;
        let watchlist_id = self
            .catalog
            .watchlist_id()
            .await
            .context("Failed to resolve IMDb watchlist")?;
        debug!(trakt_user = %trakt_user, imdb_user = %imdb_user, watchlist_id = %watchlist_id, "Resolved identities");

        let discovered = match self.options.lists {
            ListSelection::All => self
                .catalog
                .list_ids(&imdb_user)
                .await
                .context("Failed to enumerate IMDb lists")?,
            ListSelection::Ids(_) => Vec::new(),
        };
        let list_ids = selected_list_ids(&self.options.lists, discovered, &watchlist_id);

        let mut trakt_lists = self
            .tracker
            .lists(&trakt_user)
            .await
            .context("Failed to enumerate Trakt lists")?;

        let mut pairs: Vec<ListPair> = Vec::with_capacity(list_ids.len() + 1);
        let mut names = vec![WATCHLIST_NAME.to_string()];
        let mut created = Vec::new();
        for list_id in &list_ids {
            let list = match self.catalog.list(list_id).await {
                Ok(list) => list,
                Err(e) if e.is_not_found() => {
                    warn!(list_id = %list_id, "IMDb list not found, skipping");
                    continue;
                }
                Err(e) => return Err(e).with_context(|| format!("Failed to fetch IMDb list {}", list_id)),
            };
            names.push(list.name.clone());

            if let Some(pair) = pairs.iter_mut().find(|pair| pair.target.name() == list.name) {
                merge_into(pair, list);
                continue;
            }

            let (trakt_list_id, trakt_items) = self
                .resolve_list(&trakt_user, &mut trakt_lists, &list.name, &mut created)
                .await?;
            if let Some(pair) = trakt_list_id
                .as_deref()
                .and_then(|slug| pairs.iter_mut().find(|pair| pair.target.trakt_list_id() == Some(slug)))
            {
                merge_into(pair, list);
                continue;
            }

            pairs.push(ListPair {
                target: ListTarget::custom(list_id.clone(), list.name, trakt_list_id),
                items: DataPair {
                    imdb_items: list.items,
                    trakt_items,
                },
            });
        }

        let watchlist = self
            .catalog
            .list(&watchlist_id)
            .await
            .context("Failed to fetch IMDb watchlist")?;
        let trakt_watchlist = self
            .tracker
            .watchlist_items()
            .await
            .context("Failed to fetch Trakt watchlist")?;
        pairs.push(ListPair {
            target: ListTarget::watchlist(watchlist_id),
            items: DataPair {
                imdb_items: watchlist.items,
                trakt_items: trakt_watchlist,
            },
        });

        let ratings = DataPair {
            imdb_items: self
                .catalog
                .ratings(&imdb_user)
                .await
                .context("Failed to fetch IMDb ratings")?,
            trakt_items: self.tracker.ratings().await.context("Failed to fetch Trakt ratings")?,
        };

        info!(
            operation = "gather",
            requested = list_ids.len(),
            pairs = pairs.len(),
            created = created.len(),
            imdb_ratings = ratings.imdb_items.len(),
            trakt_ratings = ratings.trakt_items.len(),
            "Gathered current state"
        );

        Ok(Gathered {
            trakt_user,
            pairs,
            names,
            created,
            ratings,
        })
    }

    /// Slug and items of the Trakt list carrying this display name, created when missing.
    /// A dry run never creates, so the slug stays unknown.
    async fn resolve_list(
        &self,
        trakt_user: &str,
        trakt_lists: &mut Vec<TraktList>,
        name: &str,
        created: &mut Vec<String>,
    ) -> Result<(Option<String>, Vec<TraktItem>)> {
        if let Some(slug) = trakt_lists.iter().find(|list| list.name == name).map(|list| list.ids.slug.clone()) {
            match self.tracker.list_items(trakt_user, &slug).await {
                Ok(items) => return Ok((Some(slug), items)),
                Err(e) if e.is_not_found() => {
                    debug!(list = %name, slug = %slug, "Trakt list disappeared after enumeration");
                    trakt_lists.retain(|list| list.ids.slug != slug);
                }
                Err(e) => return Err(e).with_context(|| format!("Failed to fetch Trakt list {}", slug)),
            }
        }

        created.push(name.to_string());
        let slug = match self.create_list(trakt_user, name).await? {
            Some(list) => {
                let slug = list.ids.slug.clone();
                trakt_lists.push(list);
                Some(slug)
            }
            None => None,
        };
        Ok((slug, Vec::new()))
    }

    async fn create_list(&self, trakt_user: &str, name: &str) -> Result<Option<TraktList>> {
        if self.options.dry_run {
            info!(list = %name, "Dry run: would create Trakt list");
            return Ok(None);
        }
        info!(list = %name, "Creating Trakt list");
        let list = self
            .tracker
            .create_list(trakt_user, name)
            .await
            .with_context(|| format!("Failed to create Trakt list {}", name))?;
        debug!(list = %name, slug = %list.ids.slug, "Trakt list created");
        Ok(Some(list))
    }

    async fn sync_lists(&self, gathered: &Gathered, result: &mut SyncResult) -> Result<()> {
        for pair in &gathered.pairs {
            let diff = difference(&pair.items);
            let name = pair.target.name();

            if !diff.add.is_empty() {
                info!(list = %name, count = diff.add.len(), dry_run = self.options.dry_run, "Adding items");
                if !self.options.dry_run {
                    self.add_items(&gathered.trakt_user, &pair.target, &diff.add)
                        .await
                        .with_context(|| format!("Failed to add items to {}", name))?;
                }
            }
            if !diff.remove.is_empty() {
                info!(list = %name, count = diff.remove.len(), dry_run = self.options.dry_run, "Removing items");
                if !self.options.dry_run {
                    self.remove_items(&gathered.trakt_user, &pair.target, &diff.remove)
                        .await
                        .with_context(|| format!("Failed to remove items from {}", name))?;
                }
            }

            result.lists.push(ListReport {
                name: name.to_string(),
                imdb_list_id: pair.target.imdb_list_id().to_string(),
                watchlist: pair.target.is_watchlist(),
                created: gathered.created.iter().any(|created| created == name),
                added: diff.add.len(),
                removed: diff.remove.len(),
            });
        }

        let trakt_lists = self
            .tracker
            .lists(&gathered.trakt_user)
            .await
            .context("Failed to enumerate Trakt lists")?;
        for orphan in orphaned_lists(&trakt_lists, &gathered.names) {
            info!(list = %orphan.name, dry_run = self.options.dry_run, "Deleting Trakt list with no IMDb counterpart");
            if !self.options.dry_run {
                self.tracker
                    .delete_list(&gathered.trakt_user, &orphan.ids.slug)
                    .await
                    .with_context(|| format!("Failed to delete Trakt list {}", orphan.name))?;
            }
            result.lists_deleted.push(orphan.name.clone());
        }

        Ok(())
    }

    async fn add_items(&self, trakt_user: &str, target: &ListTarget, items: &[TraktItem]) -> Result<(), SourceError> {
        match target {
            ListTarget::Watchlist { .. } => self.tracker.add_watchlist_items(items).await,
            ListTarget::Custom {
                trakt_list_id: Some(slug),
                ..
            } => self.tracker.add_list_items(trakt_user, slug, items).await,
            ListTarget::Custom { name, .. } => Err(uncreated(name)),
        }
    }

    async fn remove_items(&self, trakt_user: &str, target: &ListTarget, items: &[TraktItem]) -> Result<(), SourceError> {
        match target {
            ListTarget::Watchlist { .. } => self.tracker.remove_watchlist_items(items).await,
            ListTarget::Custom {
                trakt_list_id: Some(slug),
                ..
            } => self.tracker.remove_list_items(trakt_user, slug, items).await,
            ListTarget::Custom { name, .. } => Err(uncreated(name)),
        }
    }

    /// Batch rating writes first, then one history check per changed rating
    async fn sync_ratings(&self, ratings: &DataPair, result: &mut SyncResult) -> Result<()> {
        let diff = difference(ratings);
        let dry_run = self.options.dry_run;

        if !diff.add.is_empty() {
            info!(count = diff.add.len(), dry_run, "Adding ratings");
            if !dry_run {
                self.tracker.add_ratings(&diff.add).await.context("Failed to add Trakt ratings")?;
            }
            result.ratings_added = diff.add.len();

            for item in &diff.add {
                let history = self.history(item).await?;
                if !history.is_empty() {
                    debug!(imdb_id = ?item.imdb_id(), "Already in history");
                    continue;
                }
                if !dry_run {
                    self.tracker
                        .add_history(item)
                        .await
                        .with_context(|| format!("Failed to add history for {:?}", item.imdb_id()))?;
                }
                result.history_added += 1;
            }
        }

        if !diff.remove.is_empty() {
            info!(count = diff.remove.len(), dry_run, "Removing ratings");
            if !dry_run {
                self.tracker
                    .remove_ratings(&diff.remove)
                    .await
                    .context("Failed to remove Trakt ratings")?;
            }
            result.ratings_removed = diff.remove.len();

            for item in &diff.remove {
                let history = self.history(item).await?;
                if history.is_empty() {
                    debug!(imdb_id = ?item.imdb_id(), "Not in history");
                    continue;
                }
                if !dry_run {
                    self.tracker
                        .remove_history(item)
                        .await
                        .with_context(|| format!("Failed to remove history for {:?}", item.imdb_id()))?;
                }
                result.history_removed += 1;
            }
        }

        Ok(())
    }

    async fn history(&self, item: &TraktItem) -> Result<Vec<TraktItem>> {
        self.tracker
            .history(item)
            .await
            .with_context(|| format!("Failed to fetch history for {:?}", item.imdb_id()))
    }
}

/// Fold an IMDb list into a pair already bound to the same Trakt list
fn merge_into(pair: &mut ListPair, list: ImdbList) {
    warn!(
        list_id = %list.id,
        list = %list.name,
        merged_into = %pair.target.imdb_list_id(),
        "IMDb lists share one Trakt list, merging their items"
    );
    for item in list.items {
        if !pair.items.imdb_items.iter().any(|existing| existing.id == item.id) {
            pair.items.imdb_items.push(item);
        }
    }
}

fn uncreated(name: &str) -> SourceError {
    SourceError::NotFound(format!("Trakt list {} was never created", name))
}
