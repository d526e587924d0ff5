use iced::keyboard::{self, key};
use iced::widget::{button, column, container, pick_list, row, text, text_input};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::{Path, PathBuf};
use tokio::task;

// Declare the application modules
mod capture;
mod state;
mod ui;

use capture::clipboard::SystemClipboard;
use capture::controller::{CaptureController, CaptureRequest, SaveOutcome};
use state::config::ConfigStore;
use state::gallery::{self, GalleryEntry, GalleryError};
use state::history::PathHistory;

/// A gallery entry paired with its decoded thumbnail
#[derive(Debug, Clone)]
pub struct GalleryItem {
    pub entry: GalleryEntry,
    pub thumb: iced::widget::image::Handle,
}

/// An in-progress rename of one gallery entry
#[derive(Debug, Clone)]
pub struct NameEdit {
    pub index: usize,
    pub buffer: String,
}

/// Main application state
struct ShotBox {
    /// The configuration file on disk
    store: ConfigStore,
    /// Recent-directories view over the store
    history: PathHistory,
    /// Capture orchestration; owns the system clipboard
    controller: CaptureController<SystemClipboard>,
    /// Directory the gallery currently shows
    browsing: PathBuf,
    /// Target directory input; empty means the default folder
    target: String,
    /// Label input for the next capture
    label: String,
    /// Options for the path picker (default folder first, then recents)
    path_choices: Vec<String>,
    /// Current gallery listing with thumbnails
    items: Vec<GalleryItem>,
    /// Rename edit in progress, if any
    editing: Option<NameEdit>,
    /// Entry shown full-size, if any
    viewing: Option<GalleryEntry>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Label input changed
    LabelChanged(String),
    /// Target directory input changed
    TargetChanged(String),
    /// Enter in the target input: browse that directory
    TargetSubmitted,
    /// A recent directory was picked from the list
    RecentPicked(String),
    /// User clicked the "Browse…" button
    BrowseFolder,
    /// Capture the clipboard and save
    Save,
    /// Background gallery reload completed
    GalleryLoaded(Result<Vec<GalleryItem>, String>),
    /// Thumbnail clicked: open the full-size viewer
    OpenEntry(usize),
    /// Leave the full-size viewer
    CloseViewer,
    /// Name label clicked: start renaming this entry
    EditStart(usize),
    /// Rename input changed
    EditInput(String),
    /// Rename confirmed
    EditSubmit,
    /// Window-level Enter
    EnterPressed,
    /// Window-level Escape
    EscapePressed,
}

impl ShotBox {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let store = ConfigStore::at_default_location();

        // A corrupt config is fatal: archiving to an invented folder
        // risks scattering screenshots where the user will not find them
        let config = store
            .load_or_init()
            .expect("Failed to load configuration. Fix or remove the config file.");

        // Without clipboard access the app cannot do its one job
        let clipboard =
            SystemClipboard::new().expect("Failed to connect to the system clipboard.");

        let history = PathHistory::new(store.clone());
        let controller = CaptureController::new(store.clone(), clipboard);

        let browsing = config.default_folder.clone();
        let path_choices = choice_strings(&history);
        let status = format!("Ready. Archive: {}", config.default_folder.display());

        println!(
            "📸 shotbox ready, archiving to {}",
            config.default_folder.display()
        );

        let app = ShotBox {
            store,
            history,
            controller,
            browsing: browsing.clone(),
            target: String::new(),
            label: String::new(),
            path_choices,
            items: Vec::new(),
            editing: None,
            viewing: None,
            status,
        };

        (app, reload_gallery(browsing))
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::LabelChanged(label) => {
                self.label = label;
                Task::none()
            }
            Message::TargetChanged(target) => {
                self.target = target;
                Task::none()
            }
            Message::TargetSubmitted => self.browse_current_target(),
            Message::RecentPicked(path) => {
                self.target = path;
                self.browse_current_target()
            }
            Message::BrowseFolder => {
                let folder = FileDialog::new()
                    .set_title("Select Target Folder")
                    .pick_folder();

                if let Some(folder) = folder {
                    self.target = folder.display().to_string();
                    return self.browse_current_target();
                }
                Task::none()
            }
            Message::Save => self.save(),
            Message::GalleryLoaded(Ok(items)) => {
                self.items = items;
                // The listing was rebuilt, so any edit index is stale
                self.editing = None;
                Task::none()
            }
            Message::GalleryLoaded(Err(e)) => {
                self.status = format!("⚠️  Could not read {}: {e}", self.browsing.display());
                Task::none()
            }
            Message::OpenEntry(index) => {
                if let Some(item) = self.items.get(index) {
                    self.viewing = Some(item.entry.clone());
                }
                Task::none()
            }
            Message::CloseViewer => {
                self.viewing = None;
                Task::none()
            }
            Message::EditStart(index) => {
                if let Some(item) = self.items.get(index) {
                    self.editing = Some(NameEdit {
                        index,
                        buffer: item.entry.display_name.clone(),
                    });
                    return text_input::focus(ui::gallery_view::rename_input_id());
                }
                Task::none()
            }
            Message::EditInput(buffer) => {
                if let Some(edit) = &mut self.editing {
                    edit.buffer = buffer;
                }
                Task::none()
            }
            Message::EditSubmit => self.confirm_rename(),
            Message::EnterPressed => {
                if self.editing.is_some() {
                    self.confirm_rename()
                } else if self.viewing.is_some() {
                    self.viewing = None;
                    Task::none()
                } else {
                    self.save()
                }
            }
            Message::EscapePressed => {
                if self.editing.is_some() {
                    // Abort the edit; the file is never touched
                    self.editing = None;
                    Task::none()
                } else if self.viewing.is_some() {
                    self.viewing = None;
                    Task::none()
                } else {
                    iced::exit()
                }
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        if let Some(entry) = &self.viewing {
            return ui::viewer::view(entry);
        }

        let selected = self
            .path_choices
            .iter()
            .find(|choice| choice.as_str() == self.target.trim())
            .cloned();

        let controls = column![
            row![
                text_input("Label for this capture", &self.label)
                    .on_input(Message::LabelChanged)
                    .on_submit(Message::Save)
                    .size(16)
                    .padding(8),
                button("Save").on_press(Message::Save).padding(10),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
            row![
                text_input("Target folder (empty = archive)", &self.target)
                    .on_input(Message::TargetChanged)
                    .on_submit(Message::TargetSubmitted)
                    .size(16)
                    .padding(8),
                pick_list(
                    self.path_choices.as_slice(),
                    selected,
                    Message::RecentPicked,
                )
                .placeholder("Recent folders")
                .text_size(14)
                .width(240),
                button("Browse…").on_press(Message::BrowseFolder).padding(10),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
        ]
        .spacing(10);

        let content = column![
            controls,
            ui::gallery_view::gallery(&self.items, self.editing.as_ref()),
            text(&self.status).size(14),
        ]
        .spacing(15)
        .padding(20);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Window-level shortcuts. These only fire when no widget captured
    /// the key, so a focused text input keeps its own Enter handling.
    fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|pressed, _modifiers| match pressed {
            keyboard::Key::Named(key::Named::Enter) => Some(Message::EnterPressed),
            keyboard::Key::Named(key::Named::Escape) => Some(Message::EscapePressed),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Capture the clipboard image and save it, then reload the gallery
    /// for the directory that received the copy.
    fn save(&mut self) -> Task<Message> {
        let request = CaptureRequest::new(self.target.clone(), self.label.clone());

        match self.controller.capture_and_save(&request) {
            Ok(SaveOutcome::Saved {
                target,
                long_path,
                short_path,
            }) => {
                println!("💾 Saved {}", long_path.display());
                if let Some(short) = &short_path {
                    println!("💾 Saved {}", short.display());
                }

                self.status = match &short_path {
                    Some(_) => format!("✅ Saved to the archive and {}", target.display()),
                    None => "✅ Saved to the archive folder.".to_string(),
                };

                self.refresh_choices();
                self.browsing = target;
                reload_gallery(self.browsing.clone())
            }
            Ok(SaveOutcome::NoImage) => {
                // Informational only: nothing was written anywhere
                self.status = "📋 No screenshot on the clipboard.".to_string();
                Task::none()
            }
            Err(e) => {
                self.status = format!("⚠️  Save failed: {e}");
                Task::none()
            }
        }
    }

    /// A directory-selection event: show the chosen directory in the
    /// gallery even though nothing was saved.
    fn browse_current_target(&mut self) -> Task<Message> {
        let target = self.target.trim();

        self.browsing = if target.is_empty() {
            match self.store.load() {
                Ok(config) => config.default_folder,
                Err(e) => {
                    self.status = format!("⚠️  {e}");
                    return Task::none();
                }
            }
        } else {
            PathBuf::from(target)
        };

        reload_gallery(self.browsing.clone())
    }

    /// Commit the rename edit: validate, rename on disk, update the
    /// listing. Conflicts and bad names keep the edit open.
    fn confirm_rename(&mut self) -> Task<Message> {
        let Some(edit) = self.editing.clone() else {
            return Task::none();
        };
        let Some(item) = self.items.get_mut(edit.index) else {
            self.editing = None;
            return Task::none();
        };

        match gallery::rename_entry(&item.entry, &edit.buffer) {
            Ok(renamed) => {
                println!(
                    "✏️  Renamed {} -> {}",
                    item.entry.display_name, renamed.display_name
                );
                self.status = format!("Renamed to {}.", renamed.display_name);
                item.entry = renamed;
                self.editing = None;
            }
            Err(e @ (GalleryError::Conflict(_) | GalleryError::InvalidName(_))) => {
                self.status = format!("⚠️  {e}");
            }
            Err(e) => {
                self.status = format!("⚠️  Rename failed: {e}");
                self.editing = None;
            }
        }
        Task::none()
    }

    /// Re-read the path picker options after a history change.
    fn refresh_choices(&mut self) {
        match choice_strings_checked(&self.history) {
            Ok(choices) => self.path_choices = choices,
            Err(e) => self.status = format!("⚠️  Could not read recent folders: {e}"),
        }
    }
}

fn main() -> iced::Result {
    iced::application("ShotBox", ShotBox::update, ShotBox::view)
        .subscription(ShotBox::subscription)
        .theme(ShotBox::theme)
        .centered()
        .run_with(ShotBox::new)
}

fn choice_strings_checked(
    history: &PathHistory,
) -> Result<Vec<String>, state::config::ConfigError> {
    Ok(history
        .choices()?
        .iter()
        .map(|path| path.display().to_string())
        .collect())
}

fn choice_strings(history: &PathHistory) -> Vec<String> {
    choice_strings_checked(history).unwrap_or_default()
}

/// Discard the current listing and re-enumerate `dir` with freshly
/// decoded thumbnails.
fn reload_gallery(dir: PathBuf) -> Task<Message> {
    Task::perform(load_items(dir), Message::GalleryLoaded)
}

/// Async gallery load; listing and decoding run on the blocking pool to
/// keep the UI responsive.
async fn load_items(dir: PathBuf) -> Result<Vec<GalleryItem>, String> {
    task::spawn_blocking(move || load_items_blocking(&dir))
        .await
        .map_err(|e| format!("Task join error: {e}"))?
}

fn load_items_blocking(dir: &Path) -> Result<Vec<GalleryItem>, String> {
    // Browsing a directory nothing was saved to yet is not an error
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = gallery::list_entries(dir).map_err(|e| e.to_string())?;

    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        match ui::thumbs::load_thumbnail(&entry.file_path) {
            Ok(thumb) => items.push(GalleryItem { entry, thumb }),
            Err(e) => eprintln!(
                "⚠️  Skipping unreadable image {}: {e}",
                entry.file_path.display()
            ),
        }
    }

    Ok(items)
}
