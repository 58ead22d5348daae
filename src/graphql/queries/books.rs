use super::prelude::*;

#[derive(Default)]
pub struct BookQueries;

#[Object]
impl BookQueries {
    /// Search the Google Books catalog
    async fn get_books_from_google(
        &self,
        ctx: &Context<'_>,
        search_input: String,
    ) -> Result<Vec<Book>> {
        let catalog = ctx.data_unchecked::<GoogleBooksClient>();

        match catalog.search(&search_input).await {
            Ok(books) => Ok(books.into_iter().map(Book::from).collect()),
            Err(e) => {
                tracing::warn!(search = %search_input, error = %e, "Catalog search failed");
                Err(coded_error(e.to_string(), UPSTREAM_ERROR))
            }
        }
    }
}
