//! Looks up the coordinates of a list of landmarks with a geocoding service
//! and prints a mapping from each name to its latitude and longitude.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    landmark_coords::run().await
}
