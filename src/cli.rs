//! The command-line surface: the thin interactive adapter standing in for
//! the browser UI, one subcommand per user action. Commands that correspond
//! to protected views boot the session and consult the Role Gate before
//! doing anything, exactly as the router consulted the guard before
//! rendering. All real work lives in the library modules; handlers here
//! only move data between the terminal and those modules.

use crate::{
    AppContext,
    api::ApiService,
    gate::{self, Verdict},
    models::{
        ImageUpload, LoginRequest, RegisterRequest, UpdatePasswordRequest, UpdateProfileRequest,
        UserListFilter, role,
    },
    routes::{self, Access},
    session::SessionSnapshot,
    tools::{base64_convert, image_tools, json_format, jwt_decode, uuid_gen, whitespace},
};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "coderzhub")]
#[command(about = "CoderzHub: developer tools with role-gated dashboards")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new account
    Register(RegisterArgs),

    /// Sign in with a username or email
    Login {
        /// Username or email
        identifier: String,

        #[arg(long)]
        password: String,
    },

    /// Sign out and clear the local session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// View or edit the signed-in profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Administrative operations
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Developer utility tools
    Tool {
        #[command(subcommand)]
        command: ToolCommands,
    },
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    /// Account tier: student, employee or corporation
    #[arg(long)]
    pub role: String,

    /// Optional profile picture to upload
    #[arg(long)]
    pub profile_image: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Edit profile fields; only the flags you pass are changed
    Update {
        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// Change the account password
    Password {
        #[arg(long)]
        current: String,

        #[arg(long)]
        new: String,

        /// Repeat the new password; must match when provided
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Upload a new profile picture
    Image {
        /// Path of the image file
        path: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// List user accounts
    Users {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        limit: u32,

        /// Only accounts with this exact role
        #[arg(long)]
        role: Option<String>,
    },

    /// Soft-delete a user account
    Delete {
        /// The account's identifier
        id: String,
    },

    /// Show aggregate account statistics
    Dashboard,
}

#[derive(Subcommand)]
pub enum ToolCommands {
    /// Generate version-4 UUIDs
    Uuid {
        #[arg(long, default_value_t = 1)]
        count: usize,
    },

    /// Pretty-print JSON
    Json {
        /// Inline input; omit to read a file or stdin
        input: Option<String>,

        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Decode a JWT's header and payload
    Jwt {
        /// The token to inspect
        token: String,
    },

    /// Base64-encode or -decode text
    Base64 {
        /// Inline input; omit to read a file or stdin
        input: Option<String>,

        #[arg(long)]
        file: Option<PathBuf>,

        /// Decode instead of encode
        #[arg(long)]
        decode: bool,
    },

    /// Remove all whitespace from text
    Space {
        /// Inline input; omit to read a file or stdin
        input: Option<String>,

        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Recompress an image as JPEG
    Compress {
        /// Path of the image file
        input: PathBuf,

        /// Output path; defaults to compressed.jpg
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JPEG quality factor, 1-100
        #[arg(long, default_value_t = 70)]
        quality: u8,
    },

    /// Convert an image to another format
    Convert {
        /// Path of the image file
        input: PathBuf,

        /// Target format: png, jpeg or webp
        #[arg(long)]
        format: image_tools::TargetFormat,

        /// Output path; defaults to converted.<ext>
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// --- Dispatch ---

/// run
///
/// Executes one command against the assembled application context and
/// returns the process exit code. Failures are rendered as inline feedback;
/// nothing here panics or propagates.
pub async fn run(ctx: &AppContext, command: Commands) -> i32 {
    match command {
        Commands::Register(args) => register(ctx, args).await,
        Commands::Login {
            identifier,
            password,
        } => login(ctx, identifier, password).await,
        Commands::Logout => logout(ctx).await,
        Commands::Whoami => whoami(ctx).await,
        Commands::Profile { command } => profile(ctx, command).await,
        Commands::Admin { command } => admin(ctx, command).await,
        Commands::Tool { command } => tool(ctx, command).await,
    }
}

// --- Role Gate Integration ---

/// guard
///
/// The protected-navigation sequence: boot the session (single-flight, so
/// repeated commands in one process cost one fetch), look the route up in
/// the static table, and let the Role Gate decide. `DenyUnauthenticated`
/// points at sign-in; `DenyForbidden` goes home with no further detail, so
/// the protected surface is not disclosed to the wrong tier.
async fn guard(ctx: &AppContext, path: &str) -> Result<SessionSnapshot, i32> {
    ctx.session.initialize().await;
    let snapshot = ctx.session.read();

    let accepted = match routes::access_for(path) {
        Some(Access::Protected(roles)) => roles,
        // Public (or unrouted) surfaces are never gated.
        _ => return Ok(snapshot),
    };

    match gate::evaluate(accepted, &snapshot) {
        Verdict::Allow => Ok(snapshot),
        Verdict::Pending => {
            // The bootstrap above settles before evaluation; reaching this
            // arm means the caller skipped it.
            eprintln!("Session is still loading, try again.");
            Err(1)
        }
        Verdict::DenyUnauthenticated => {
            eprintln!("You are not signed in. Run `coderzhub login <identifier>` first.");
            Err(1)
        }
        Verdict::DenyForbidden => {
            println!("Taking you to {}.", routes::HOME);
            Err(1)
        }
    }
}

// --- Auth Handlers ---

async fn register(ctx: &AppContext, args: RegisterArgs) -> i32 {
    // Same pre-flight validation the registration form performs.
    if args.role.is_empty() || !args.email.contains('@') {
        eprintln!("Please select a role and enter a valid email.");
        return 1;
    }
    if ![role::STUDENT, role::EMPLOYEE, role::CORPORATION].contains(&args.role.as_str()) {
        eprintln!(
            "Role must be one of: {}, {}, {}.",
            role::STUDENT,
            role::EMPLOYEE,
            role::CORPORATION
        );
        return 1;
    }

    let profile_image = match args.profile_image {
        Some(path) => match read_upload(&path) {
            Ok(upload) => Some(upload),
            Err(code) => return code,
        },
        None => None,
    };

    let req = RegisterRequest {
        first_name: args.first_name,
        last_name: args.last_name,
        username: args.username,
        email: args.email,
        password: args.password,
        role: args.role,
        profile_image,
    };

    match ctx.api.register(req).await {
        Ok(raw) => match ctx.session.login(raw) {
            Ok(identity) => {
                println!("Welcome, {}! Your account was created.", identity.username);
                0
            }
            Err(e) => {
                eprintln!("Registration succeeded but the response was unusable: {}", e);
                1
            }
        },
        Err(e) => {
            eprintln!("Registration failed: {}", e);
            1
        }
    }
}

async fn login(ctx: &AppContext, identifier: String, password: String) -> i32 {
    let req = LoginRequest {
        identifier,
        password,
    };

    match ctx.api.login(req).await {
        Ok(raw) => match ctx.session.login(raw) {
            Ok(identity) => {
                // Redirect-by-role, as the sign-in page navigates.
                let destination = if identity.role_str() == Some(role::ADMIN) {
                    "/admin/dashboard"
                } else {
                    "/user/dashboard"
                };
                println!("Signed in as {}. Next stop: {}", identity.username, destination);
                0
            }
            Err(e) => {
                eprintln!("Sign-in succeeded but the response was unusable: {}", e);
                1
            }
        },
        Err(e) => {
            eprintln!("Sign-in failed: {}", e);
            1
        }
    }
}

async fn logout(ctx: &AppContext) -> i32 {
    // Tell the backend first, then clear locally. A network failure still
    // clears the local session: worst case the server side expires on its
    // own.
    if let Err(e) = ctx.api.logout().await {
        tracing::warn!("backend logout failed: {}", e);
    }
    ctx.session.logout();
    println!("Signed out.");
    0
}

async fn whoami(ctx: &AppContext) -> i32 {
    let snapshot = match guard(ctx, "/user/dashboard").await {
        Ok(s) => s,
        Err(code) => return code,
    };

    // guard only returns Allow snapshots for this route, so the identity is
    // always present here.
    if let Some(identity) = snapshot.identity {
        println!("{} {} ({})", identity.first_name, identity.last_name, identity.username);
        println!("  id:    {}", identity.id);
        println!("  email: {}", identity.email);
        println!("  role:  {}", identity.role.unwrap_or_default());
        if let Some(image) = identity.profile_image {
            println!("  image: {}", image);
        }
    }
    0
}

// --- Profile Handlers ---

async fn profile(ctx: &AppContext, command: ProfileCommands) -> i32 {
    if let Err(code) = guard(ctx, "/user/dashboard").await {
        return code;
    }

    match command {
        ProfileCommands::Update {
            first_name,
            last_name,
            username,
            email,
        } => {
            let req = UpdateProfileRequest {
                first_name,
                last_name,
                username,
                email,
            };
            if req.is_empty() {
                eprintln!("Nothing to update; pass at least one field flag.");
                return 1;
            }

            match ctx.api.update_profile(req).await {
                Ok(raw) => match ctx.session.login(raw) {
                    // The store only ever holds server-confirmed copies.
                    Ok(_) => {
                        println!("Profile updated.");
                        0
                    }
                    Err(e) => {
                        eprintln!("Update succeeded but the response was unusable: {}", e);
                        1
                    }
                },
                Err(e) => {
                    eprintln!("Profile update failed: {}", e);
                    1
                }
            }
        }

        ProfileCommands::Password {
            current,
            new,
            confirm,
        } => {
            if let Some(confirm) = confirm {
                if confirm != new {
                    eprintln!("New password and confirm password do not match.");
                    return 1;
                }
            }

            let req = UpdatePasswordRequest {
                current_password: current,
                new_password: new,
            };
            match ctx.api.update_password(req).await {
                Ok(()) => {
                    println!("Password updated.");
                    0
                }
                Err(e) => {
                    eprintln!("Password update failed: {}", e);
                    1
                }
            }
        }

        ProfileCommands::Image { path } => {
            let upload = match read_upload(&path) {
                Ok(upload) => upload,
                Err(code) => return code,
            };

            match ctx.api.update_profile_image(upload).await {
                Ok(raw) => match ctx.session.login(raw) {
                    Ok(_) => {
                        println!("Profile image updated.");
                        0
                    }
                    Err(e) => {
                        eprintln!("Upload succeeded but the response was unusable: {}", e);
                        1
                    }
                },
                Err(e) => {
                    eprintln!("Image upload failed: {}", e);
                    1
                }
            }
        }
    }
}

// --- Admin Handlers ---

async fn admin(ctx: &AppContext, command: AdminCommands) -> i32 {
    match command {
        AdminCommands::Users { page, limit, role } => {
            if let Err(code) = guard(ctx, "/admin/users").await {
                return code;
            }

            let filter = UserListFilter {
                page: Some(page),
                limit: Some(limit),
                role,
            };
            match ctx.api.list_users(filter).await {
                Ok(listing) => {
                    for user in &listing.users {
                        let id = user.id.as_deref().or(user.mongo_id.as_deref()).unwrap_or("-");
                        let status = if user.is_active { "active" } else { "inactive" };
                        println!(
                            "{}  {}  {} {}  <{}>  [{}] {}",
                            id,
                            user.username,
                            user.first_name,
                            user.last_name,
                            user.email,
                            user.role.as_deref().unwrap_or("-"),
                            status,
                        );
                    }
                    println!("{} of {} account(s) shown.", listing.users.len(), listing.total);
                    0
                }
                Err(e) => {
                    eprintln!("Could not fetch users: {}", e);
                    1
                }
            }
        }

        AdminCommands::Delete { id } => {
            if let Err(code) = guard(ctx, "/admin/users").await {
                return code;
            }

            match ctx.api.delete_user(&id).await {
                Ok(()) => {
                    println!("User {} deleted.", id);
                    0
                }
                Err(e) => {
                    eprintln!("Failed to delete user {}: {}", id, e);
                    1
                }
            }
        }

        AdminCommands::Dashboard => {
            if let Err(code) = guard(ctx, "/admin/dashboard").await {
                return code;
            }

            match ctx.api.dashboard_stats().await {
                Ok(stats) => {
                    println!("Total users:   {}", stats.total_users);
                    println!("  students:     {}", stats.students);
                    println!("  employees:    {}", stats.employees);
                    println!("  corporations: {}", stats.corporations);
                    println!("  admins:       {}", stats.admins);
                    0
                }
                Err(e) => {
                    eprintln!("Could not fetch dashboard stats: {}", e);
                    1
                }
            }
        }
    }
}

// --- Tool Handlers ---

async fn tool(ctx: &AppContext, command: ToolCommands) -> i32 {
    // Tools carry no session state of their own but navigation to them is
    // gated like any other member view.
    let route = match &command {
        ToolCommands::Uuid { .. } => "/tools/uuid",
        ToolCommands::Json { .. } => "/tools/json",
        ToolCommands::Jwt { .. } => "/tools/jwt",
        ToolCommands::Base64 { .. } => "/tools/base64",
        ToolCommands::Space { .. } => "/tools/space",
        ToolCommands::Compress { .. } => "/tools/image-compressor",
        ToolCommands::Convert { .. } => "/tools/image-type-converter",
    };
    if let Err(code) = guard(ctx, route).await {
        return code;
    }

    match command {
        ToolCommands::Uuid { count } => {
            for id in uuid_gen::generate_many(count) {
                println!("{}", id);
            }
            0
        }

        ToolCommands::Json { input, file } => {
            let text = match read_text(input, file) {
                Ok(text) => text,
                Err(code) => return code,
            };
            match json_format::format(&text) {
                Ok(pretty) => {
                    println!("{}", pretty);
                    0
                }
                Err(e) => {
                    eprintln!("{}", e);
                    1
                }
            }
        }

        ToolCommands::Jwt { token } => match jwt_decode::decode(&token) {
            Ok(decoded) => {
                println!("Header:\n{}\n", decoded.header);
                println!("Payload:\n{}", decoded.payload);
                0
            }
            Err(e) => {
                eprintln!("{}", e);
                1
            }
        },

        ToolCommands::Base64 {
            input,
            file,
            decode,
        } => {
            let text = match read_text(input, file) {
                Ok(text) => text,
                Err(code) => return code,
            };
            if decode {
                match base64_convert::decode(&text) {
                    Ok(plain) => {
                        println!("{}", plain);
                        0
                    }
                    Err(e) => {
                        eprintln!("{}", e);
                        1
                    }
                }
            } else {
                println!("{}", base64_convert::encode(&text));
                0
            }
        }

        ToolCommands::Space { input, file } => {
            let text = match read_text(input, file) {
                Ok(text) => text,
                Err(code) => return code,
            };
            let stripped = whitespace::strip(&text);
            println!("{}", stripped.output);
            eprintln!("Removed {} whitespace character(s).", stripped.removed);
            0
        }

        ToolCommands::Compress {
            input,
            output,
            quality,
        } => {
            let bytes = match read_bytes(&input) {
                Ok(bytes) => bytes,
                Err(code) => return code,
            };

            match image_tools::compress(&bytes, quality) {
                Ok(compressed) => {
                    let target = output.unwrap_or_else(|| PathBuf::from("compressed.jpg"));
                    if let Err(e) = std::fs::write(&target, &compressed.data) {
                        eprintln!("Could not write {}: {}", target.display(), e);
                        return 1;
                    }
                    println!(
                        "{} -> {} ({} B -> {} B, {:.1}% saved)",
                        input.display(),
                        target.display(),
                        compressed.original_len,
                        compressed.compressed_len,
                        compressed.savings_percent(),
                    );
                    0
                }
                Err(e) => {
                    eprintln!("{}", e);
                    1
                }
            }
        }

        ToolCommands::Convert {
            input,
            format,
            output,
        } => {
            let bytes = match read_bytes(&input) {
                Ok(bytes) => bytes,
                Err(code) => return code,
            };

            match image_tools::convert(&bytes, format) {
                Ok(converted) => {
                    let target = output
                        .unwrap_or_else(|| PathBuf::from(format!("converted.{}", format.extension())));
                    if let Err(e) = std::fs::write(&target, &converted) {
                        eprintln!("Could not write {}: {}", target.display(), e);
                        return 1;
                    }
                    println!("{} -> {}", input.display(), target.display());
                    0
                }
                Err(e) => {
                    eprintln!("{}", e);
                    1
                }
            }
        }
    }
}

// --- Input Helpers ---

/// Inline argument first, then a file, then stdin: the terminal stand-ins
/// for the tool pages' input box.
fn read_text(input: Option<String>, file: Option<PathBuf>) -> Result<String, i32> {
    if let Some(text) = input {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path).map_err(|e| {
            eprintln!("Could not read {}: {}", path.display(), e);
            1
        });
    }

    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer).map_err(|e| {
        eprintln!("Could not read stdin: {}", e);
        1
    })?;
    Ok(buffer)
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, i32> {
    std::fs::read(path).map_err(|e| {
        eprintln!("Could not read {}: {}", path.display(), e);
        1
    })
}

fn read_upload(path: &Path) -> Result<ImageUpload, i32> {
    let bytes = read_bytes(path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.bin")
        .to_string();
    Ok(ImageUpload { file_name, bytes })
}
