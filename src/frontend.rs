use std::rc::Rc;

use gloo_file::{File, FileList};
use leptos::*;
use leptos_meta::{provide_meta_context, Title};
use leptos_router::*;
use wasm_bindgen::prelude::*;
use web_sys::{Event, SubmitEvent};

use crate::api::ApiClient;
use crate::catalog::{self, Catalog};
use crate::config::ClientConfig;
use crate::decode::PreviewGrid;
use crate::filter::{FileTypeFilter, FilterState};
use crate::preview::{self, PreviewSlot, PreviewState};
use crate::routes::AppRoute;
use crate::session::{self, AuthForm, AuthMode, Session};
use crate::upload::{self, SelectedFile, UploadForm, ACCEPTED_UPLOAD_TYPES};
use crate::web::{GlooTransport, LocalStorageTokenStore};
use crate::FileRecord;

#[derive(Clone)]
struct AppContext {
    api: ApiClient,
    session: Session,
}

#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    provide_meta_context();
    provide_context(AppContext {
        api: ApiClient::new(config, Rc::new(GlooTransport)),
        session: Session::new(Rc::new(LocalStorageTokenStore)),
    });

    view! {
        <StyleProvider />
        <Title text="filedrop" />
        <Router>
            <main class="app">
                <Routes>
                    <Route path=AppRoute::Upload.path() view=UploadPage />
                    <Route path=AppRoute::Admin.path() view=AdminLogin />
                    <Route path=AppRoute::Dashboard.path() view=AdminDashboard />
                    <Route path="/*any" view=|| view! { <Redirect path=AppRoute::Upload.path() /> } />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn UploadPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let form = create_rw_signal(UploadForm::default());
    let file_input_ref = create_node_ref::<html::Input>();

    let on_file_change = move |_ev: Event| {
        let Some(input) = file_input_ref.get_untracked() else {
            return;
        };
        let Some(file) = input
            .files()
            .and_then(|files| FileList::from(files).first().cloned())
        else {
            form.update(UploadForm::clear_file);
            return;
        };

        spawn_local(async move {
            match read_selected_file(&file).await {
                Ok(selected) => form.update(|f| f.select_file(selected)),
                Err(e) => {
                    log::error!("Failed to read {}: {}", file.name(), e);
                    form.update(UploadForm::clear_file);
                }
            }
        });
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(pending) = form.try_update(UploadForm::begin_submit).flatten() else {
            return;
        };

        let api = ctx.api.clone();
        spawn_local(async move {
            let result = upload::submit(&api, Some(&pending.file), &pending.display_name).await;
            let uploaded = result.is_ok();
            form.update(|f| f.finish_submit(result));
            if uploaded {
                if let Some(input) = file_input_ref.get_untracked() {
                    input.set_value("");
                }
            }
        });
    };

    view! {
        <div class="page upload-page">
            <nav class="top-links">
                <A href=AppRoute::Admin.path()>"Admin Login"</A>
            </nav>
            <section class="card">
                <h2>"Upload File"</h2>
                {move || form.with(|f| f.error().map(|e| view! { <div class="alert alert-error">{e.to_owned()}</div> }))}
                {move || form.with(|f| f.message().map(|m| view! { <div class="alert alert-success">{m.to_owned()}</div> }))}
                <form on:submit=on_submit>
                    <div class="form-field">
                        <label class="field-label">"Your Name (optional)"</label>
                        <input
                            type="text"
                            placeholder="Enter your name"
                            prop:value=move || form.with(|f| f.display_name.clone())
                            on:input=move |ev| form.update(|f| f.display_name = event_target_value(&ev))
                        />
                    </div>
                    <div class="form-field">
                        <label class="field-label">"Choose file"</label>
                        <input
                            type="file"
                            accept=ACCEPTED_UPLOAD_TYPES
                            node_ref=file_input_ref
                            on:change=on_file_change
                        />
                    </div>
                    <button type="submit" class="primary-btn" disabled=move || form.with(UploadForm::in_flight)>
                        {move || if form.with(UploadForm::in_flight) { "Uploading..." } else { "Upload" }}
                    </button>
                </form>
            </section>
        </div>
    }
}

async fn read_selected_file(file: &File) -> Result<SelectedFile, String> {
    let bytes = gloo_file::futures::read_as_bytes(file)
        .await
        .map_err(|e| format!("{:?}", e))?;
    Ok(SelectedFile {
        name: file.name(),
        content_type: file.raw_mime_type(),
        bytes,
    })
}

#[component]
fn AdminLogin() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let form = create_rw_signal(AuthForm::default());
    let navigate = use_navigate();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(credentials) = form.try_update(AuthForm::begin_submit) else {
            return;
        };
        let mode = form.with_untracked(AuthForm::mode);
        let ctx = ctx.clone();
        let navigate = navigate.clone();

        spawn_local(async move {
            match mode {
                AuthMode::Login => {
                    let result = session::login(&ctx.api, &ctx.session, &credentials).await;
                    if form.try_update(|f| f.finish_login(result)).unwrap_or(false) {
                        navigate(AppRoute::Dashboard.path(), Default::default());
                    }
                }
                AuthMode::Register => {
                    let result = session::register(&ctx.api, &credentials).await;
                    form.update(|f| f.finish_register(result));
                }
            }
        });
    };

    let is_register = move || form.with(|f| f.mode() == AuthMode::Register);

    view! {
        <div class="page login-page">
            <section class="card">
                <h2>{move || if is_register() { "Admin Register" } else { "Admin Login" }}</h2>
                {move || form.with(|f| f.error().map(|e| view! { <div class="alert alert-error">{e.to_owned()}</div> }))}
                {move || form.with(|f| f.success().map(|m| view! { <div class="alert alert-success">{m.to_owned()}</div> }))}
                <form on:submit=on_submit>
                    <div class="form-field">
                        <label class="field-label">"Username"</label>
                        <input
                            type="text"
                            placeholder="Enter admin username"
                            required
                            prop:value=move || form.with(|f| f.username.clone())
                            on:input=move |ev| form.update(|f| f.username = event_target_value(&ev))
                        />
                    </div>
                    <div class="form-field">
                        <label class="field-label">"Password"</label>
                        <input
                            type="password"
                            placeholder="Enter password"
                            required
                            prop:value=move || form.with(|f| f.password.clone())
                            on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                        />
                    </div>
                    <button type="submit" class="primary-btn">
                        {move || if is_register() { "Register" } else { "Login" }}
                    </button>
                </form>
                <div class="mode-switch">
                    <Show
                        when=is_register
                        fallback=move || view! {
                            <span>
                                "New admin? "
                                <button type="button" class="link-btn" on:click=move |_| form.update(|f| f.switch_mode(AuthMode::Register))>
                                    "Register"
                                </button>
                            </span>
                        }
                    >
                        <span>
                            "Already have an account? "
                            <button type="button" class="link-btn" on:click=move |_| form.update(|f| f.switch_mode(AuthMode::Login))>
                                "Login"
                            </button>
                        </span>
                    </Show>
                </div>
            </section>
        </div>
    }
}

#[component]
fn AdminDashboard() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    if !ctx.session.is_authenticated() {
        log::info!("No admin token stored, redirecting to login");
        return view! { <Redirect path=AppRoute::Admin.path() /> }.into_view();
    }

    let catalog = create_rw_signal(Catalog::default());
    let (search_term, set_search_term) = create_signal(String::new());
    let (selected_type, set_selected_type) = create_signal(FileTypeFilter::All);
    let navigate = use_navigate();

    {
        let ctx = ctx.clone();
        create_effect(move |_| {
            let ctx = ctx.clone();
            spawn_local(async move {
                catalog.update(Catalog::begin_refresh);
                let result = catalog::list_files(&ctx.api, &ctx.session).await;
                catalog.update(|c| c.finish_refresh(result));
            });
        });
    }

    let filtered_files = create_memo(move |_| {
        let state = FilterState {
            search_term: search_term.get(),
            selected_type: selected_type.get(),
        };
        catalog.with(|c| c.filtered(&state))
    });

    let session = ctx.session.clone();
    let on_logout = move |_| {
        if let Err(e) = session.logout() {
            log::warn!("Logout failed: {}", e);
        }
        navigate(AppRoute::Admin.path(), Default::default());
    };

    view! {
        <div class="dashboard">
            <header class="navbar">
                <span class="brand">"IoT Platform"</span>
                <input
                    type="search"
                    class="search-input"
                    placeholder="Search files..."
                    prop:value=search_term
                    on:input=move |ev| set_search_term.set(event_target_value(&ev))
                />
                <button type="button" class="logout-btn" on:click=on_logout>"Logout"</button>
            </header>

            <section class="previews">
                <h4>"File Previews"</h4>
                <PreviewCarousel files=filtered_files />
            </section>

            <section class="files">
                <div class="files-header">
                    <h4>"Uploaded Files"</h4>
                    <select
                        prop:value=move || selected_type.get().value()
                        on:change=move |ev| {
                            set_selected_type.set(event_target_value(&ev).parse().unwrap_or_default())
                        }
                    >
                        {FileTypeFilter::ALL
                            .into_iter()
                            .map(|t| view! { <option value=t.value()>{t.label()}</option> })
                            .collect_view()}
                    </select>
                </div>
                <Show
                    when=move || !catalog.with(Catalog::is_loading)
                    fallback=|| view! { <div class="loading">"loading files..."</div> }
                >
                    <Show when=move || catalog.with(|c| c.last_error().is_some())>
                        <div class="alert alert-error">"Unable to load files."</div>
                    </Show>
                    <FileTable files=filtered_files />
                </Show>
            </section>
        </div>
    }
    .into_view()
}

#[component]
fn FileTable(files: Memo<Vec<FileRecord>>) -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    view! {
        <table class="file-table">
            <thead>
                <tr>
                    <th>"#"</th>
                    <th>"File Name"</th>
                    <th>"MIME Type"</th>
                    <th>"Uploaded By"</th>
                    <th>"Uploaded At"</th>
                    <th>"Actions"</th>
                </tr>
            </thead>
            <tbody>
                <For
                    each=move || files.get().into_iter().enumerate()
                    key=|(index, file)| (*index, file.id.clone())
                    children=move |(index, file)| {
                        let download_url = catalog::file_url(&ctx.api, &file.id);
                        view! {
                            <tr>
                                <td>{index + 1}</td>
                                <td>{file.name.clone()}</td>
                                <td>{file.mimetype.clone()}</td>
                                <td>{file.uploader().to_owned()}</td>
                                <td>{file.uploaded_at_display()}</td>
                                <td>
                                    <a href=download_url target="_blank" rel="noopener noreferrer" class="action-btn">
                                        "Download"
                                    </a>
                                </td>
                            </tr>
                        }
                    }
                />
            </tbody>
        </table>
    }
}

#[component]
fn PreviewCarousel(files: Memo<Vec<FileRecord>>) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let (index, set_index) = create_signal(0usize);
    let slot = create_rw_signal(PreviewSlot::default());

    let active = create_memo(move |_| {
        files.with(|list| {
            let last = list.len().checked_sub(1)?;
            list.get(index.get().min(last)).cloned()
        })
    });

    create_effect(move |_| {
        let Some(record) = active.get() else {
            return;
        };
        let Some(ticket) = slot.try_update(PreviewSlot::begin) else {
            return;
        };
        let api = ctx.api.clone();
        spawn_local(async move {
            let state = preview::load_preview(&api, &record).await;
            slot.update(|s| {
                s.resolve(ticket, state);
            });
        });
    });

    let step = move |forward: bool| {
        let len = files.with(Vec::len);
        if len == 0 {
            return;
        }
        set_index.update(|i| {
            let current = (*i).min(len - 1);
            *i = if forward { (current + 1) % len } else { (current + len - 1) % len };
        });
    };

    view! {
        <div class="carousel">
            {move || match active.get() {
                Some(record) => {
                    let title = record.name.clone();
                    view! {
                        <div class="carousel-item">
                            {move || render_preview(slot.with(|s| s.state().clone()), title.clone())}
                            <div class="carousel-caption">
                                <h5>{record.name}</h5>
                                <p>{record.mimetype}</p>
                            </div>
                        </div>
                    }
                    .into_view()
                }
                None => view! { <div class="preview-box">"No files to preview"</div> }.into_view(),
            }}
            <div class="carousel-controls">
                <button type="button" class="action-btn" on:click=move |_| step(false)>"previous"</button>
                <button type="button" class="action-btn" on:click=move |_| step(true)>"next"</button>
            </div>
        </div>
    }
}

fn render_preview(state: PreviewState, title: String) -> View {
    match state {
        PreviewState::Loading => view! { <div class="preview-box">"loading preview..."</div> }.into_view(),
        PreviewState::Document { url } => view! {
            <iframe src=url title=title class="preview-frame"></iframe>
        }
        .into_view(),
        PreviewState::Image { url } => view! {
            <img src=url alt=title class="preview-image" />
        }
        .into_view(),
        PreviewState::Table(grid) => view! { <PreviewTable grid=grid /> }.into_view(),
        PreviewState::Failed(message) => view! { <div class="preview-box">{message}</div> }.into_view(),
        PreviewState::Unsupported => view! { <div class="preview-box">"Unsupported Preview"</div> }.into_view(),
    }
}

#[component]
fn PreviewTable(grid: PreviewGrid) -> impl IntoView {
    view! {
        <div class="preview-table">
            <table>
                <tbody>
                    {grid
                        .into_rows()
                        .into_iter()
                        .map(|row| view! {
                            <tr>{row.into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}</tr>
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
}

#[wasm_bindgen]
pub fn run() {
    console_error_panic_hook::set_once();
    crate::web::init_logging(log::LevelFilter::Debug);

    wasm_bindgen_futures::spawn_local(async {
        let config = crate::web::load_runtime_config().await;
        log::info!("Using API at {}", config.api_base_url);
        mount_to_body(move || view! { <App config=config /> });
    });
}

// CSS-in-Rust: layout only, the upload/admin/dashboard views share it
const MAIN_STYLES: &str = r#"
body {
    font-family: system-ui, sans-serif;
    background-color: #f8f9fa;
    color: #212529;
    margin: 0;
}

.page {
    max-width: 600px;
    margin: 60px auto;
}

.login-page {
    max-width: 400px;
    margin-top: 100px;
}

.top-links {
    display: flex;
    justify-content: flex-end;
    margin-bottom: 10px;
}

.card {
    background: #fff;
    border: 1px solid #dee2e6;
    border-radius: 6px;
    padding: 24px;
}

.form-field {
    margin-bottom: 16px;
}

.field-label {
    display: block;
    margin-bottom: 6px;
}

.form-field input {
    width: 100%;
    box-sizing: border-box;
    padding: 8px;
}

.alert {
    padding: 10px 14px;
    border-radius: 4px;
    margin-bottom: 16px;
}

.alert-error {
    background: #f8d7da;
    color: #842029;
}

.alert-success {
    background: #d1e7dd;
    color: #0f5132;
}

.primary-btn {
    width: 100%;
    padding: 10px;
    cursor: pointer;
}

.primary-btn:disabled {
    cursor: not-allowed;
    opacity: 0.6;
}

.link-btn {
    background: none;
    border: none;
    color: #0d6efd;
    cursor: pointer;
    padding: 0;
}

.mode-switch {
    margin-top: 16px;
    text-align: center;
}

.navbar {
    display: flex;
    gap: 12px;
    align-items: center;
    background: #212529;
    color: #fff;
    padding: 12px 24px;
}

.navbar .brand {
    flex: 1;
    font-weight: 600;
}

.previews, .files {
    max-width: 1100px;
    margin: 24px auto;
    padding: 0 16px;
}

.files-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
}

.carousel-item {
    position: relative;
}

.preview-box, .preview-frame, .preview-image, .preview-table {
    height: 260px;
    width: 100%;
}

.preview-box {
    display: flex;
    align-items: center;
    justify-content: center;
}

.preview-image {
    object-fit: contain;
}

.preview-table {
    overflow-x: auto;
}

.carousel-caption {
    text-align: center;
}

.carousel-controls {
    display: flex;
    justify-content: space-between;
}

.file-table, .preview-table table {
    width: 100%;
    border-collapse: collapse;
}

.file-table th, .file-table td, .preview-table td {
    border: 1px solid #dee2e6;
    padding: 6px 8px;
}

.loading {
    text-align: center;
    padding: 20px;
}
"#;

// CSS-in-Rust: Component that injects styles
#[component]
fn StyleProvider() -> impl IntoView {
    view! {
        <style>{MAIN_STYLES}</style>
    }
}
