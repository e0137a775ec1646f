use anyhow::{Context, Result};
use rspotify::{prelude::*, scopes, AuthCodeSpotify, Config, Credentials, OAuth};

use crate::config::AppConfig;

pub fn oauth_scopes() -> std::collections::HashSet<String> {
    scopes!(
        "user-library-read",
        "user-library-modify",
        "user-read-playback-state",
        "user-modify-playback-state",
        "playlist-read-private",
        "playlist-read-collaborative",
        "playlist-modify-public",
        "playlist-modify-private"
    )
}

/// Establish an authorized rspotify session.
///
/// A cached token is reused when present and still valid for the requested
/// scopes. Otherwise the consent page is opened in the browser and the user is
/// prompted for the URL they were redirected to. The token is written back to
/// the cache and refreshed by rspotify from then on.
pub async fn perform_oauth_flow(config: &AppConfig) -> Result<AuthCodeSpotify> {
    let credentials = Credentials::new(&config.client_id, &config.client_secret);
    let oauth = OAuth {
        redirect_uri: config.redirect_uri.clone(),
        scopes: oauth_scopes(),
        ..Default::default()
    };
    let spotify_config = Config {
        token_cached: true,
        token_refreshing: true,
        cache_path: config.token_cache_path.clone(),
        ..Default::default()
    };

    let spotify = AuthCodeSpotify::with_config(credentials, oauth, spotify_config);

    tracing::info!(cache = %config.token_cache_path.display(), "Starting OAuth flow");
    let url = spotify
        .get_authorize_url(false)
        .context("Failed to build the authorization URL")?;

    spotify
        .prompt_for_token(&url)
        .await
        .context("Authentication failed. Check SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET and SPOTIFY_REDIRECT_URI")?;

    let user = spotify
        .me()
        .await
        .context("Authorized, but could not fetch the current Spotify user")?;
    tracing::info!(
        user_id = %user.id,
        display_name = ?user.display_name,
        "Connected to Spotify"
    );

    Ok(spotify)
}
